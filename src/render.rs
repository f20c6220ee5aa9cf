// src/render.rs
use crate::display::{DisplayRegion, LaneStatus, PostEntry, sanitize};
use crate::errors::FetchError;
use crate::feed::{FeedId, PostSummary};
use crate::fetch::FeedFetcher;
use log::warn;

pub const EMPTY_NOTICE: &str = "No posts found.";

pub fn begin_loading(region: &mut dyn DisplayRegion) {
    region.clear();
    region.set_status(LaneStatus::Loading);
}

/// Replaces whatever the region shows with the result of one fetch.
pub fn show_outcome(
    region: &mut dyn DisplayRegion,
    id: &FeedId,
    outcome: Result<Vec<PostSummary>, FetchError>,
) {
    region.clear();
    match outcome {
        Ok(posts) if posts.is_empty() => region.set_status(LaneStatus::Empty),
        Ok(posts) => {
            for post in &posts {
                region.append_item(PostEntry::from_post(post));
            }
        }
        Err(e) => {
            warn!("fetch error for r/{}: {}", id, e);
            region.set_status(LaneStatus::Error(error_message(id, &e)));
        }
    }
}

pub fn error_message(id: &FeedId, err: &FetchError) -> String {
    format!("Could not load r/{}: {}", sanitize(id.as_str()), sanitize(&err.to_string()))
}

pub async fn fetch_and_render(fetcher: &FeedFetcher, id: &FeedId, region: &mut dyn DisplayRegion) {
    begin_loading(region);
    let outcome = fetcher.fetch_posts(id).await;
    show_outcome(region, id, outcome);
}
