// src/add_lane.rs
use crate::errors::{FetchError, ValidationError};
use crate::feed::FeedId;
use crate::lanes::LaneList;
use log::{info, warn};

/// What the caller should do after the user confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmStep {
    /// Nothing usable was typed, or a check is already running.
    Ignore,
    /// Show the notice; the modal has been closed.
    Reject(String),
    /// Run the existence check for this feed.
    Verify(FeedId),
}

/// What the caller should do once the existence check comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyStep {
    /// Add the lane; the modal has been closed.
    Accept(FeedId),
    /// Show the notice; the modal stays open for correction.
    Reject(String),
}

#[derive(Debug, Default, Clone)]
pub struct AddLaneFlow {
    open: bool,
    input: String,
    pending: bool,
}

impl AddLaneFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The confirm control is disabled while a check is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn open(&mut self) {
        self.open = true;
        self.input.clear();
    }

    pub fn cancel(&mut self) {
        self.open = false;
    }

    pub fn push_char(&mut self, c: char) {
        if !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn confirm(&mut self, lanes: &LaneList) -> ConfirmStep {
        if !self.open || self.pending {
            return ConfirmStep::Ignore;
        }
        let id = match FeedId::parse(&self.input) {
            Ok(id) => id,
            Err(_) => return ConfirmStep::Ignore,
        };
        if lanes.contains(&id) {
            self.open = false;
            return ConfirmStep::Reject(ValidationError::Duplicate(id.to_string()).to_string());
        }
        self.pending = true;
        info!("AddLaneFlow: verifying r/{}", id);
        ConfirmStep::Verify(id)
    }

    pub fn finish(&mut self, id: FeedId, outcome: Result<(), FetchError>) -> VerifyStep {
        self.pending = false;
        match outcome {
            Ok(()) => {
                self.open = false;
                VerifyStep::Accept(id)
            }
            Err(e) => {
                warn!("AddLaneFlow: r/{} rejected: {}", id, e);
                VerifyStep::Reject(format!("Subreddit not found or inaccessible: {}", id))
            }
        }
    }
}
