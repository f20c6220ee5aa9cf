// src/event.rs
use crate::errors::FetchError;
use crate::feed::{FeedId, PostSummary};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A lane fetch finished. `ticket` identifies which request it answers.
    PostsLoaded {
        id: FeedId,
        ticket: u64,
        outcome: Result<Vec<PostSummary>, FetchError>,
        timestamp: DateTime<Utc>,
    },
    /// The existence check started by the add-lane flow finished.
    LaneVerified { id: FeedId, outcome: Result<(), FetchError> },
}
