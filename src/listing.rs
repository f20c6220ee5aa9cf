// src/listing.rs
use crate::errors::FetchError;
use crate::feed::PostSummary;
use log::debug;
use serde::Deserialize;

pub const SUBREDDIT_KIND: &str = "t5";

// Wire shapes of the listing and about endpoints
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RawPost,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    title: String,
    author: String,
    score: i64,
    num_comments: u64,
    permalink: String,
}

#[derive(Debug, Deserialize)]
struct About {
    kind: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ListingParser {
    post_limit: Option<usize>,
}

impl ListingParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_post_limit(mut self, limit: usize) -> Self {
        self.post_limit = Some(limit);
        self
    }

    /// Turns a listing body into posts, in the order the API ranked them.
    pub fn parse_posts(&self, body: &str) -> Result<Vec<PostSummary>, FetchError> {
        let listing: Listing = serde_json::from_str(body).map_err(|e| {
            debug!("ListingParser: rejecting listing body: {}", e);
            FetchError::InvalidResponse
        })?;

        let mut posts: Vec<PostSummary> = listing
            .data
            .children
            .into_iter()
            .map(|child| {
                let p = child.data;
                PostSummary::new(p.title, p.author, p.score, p.num_comments, p.permalink)
            })
            .collect();

        if let Some(limit) = self.post_limit {
            posts.truncate(limit);
        }
        Ok(posts)
    }

    /// Checks that an about body describes a subreddit.
    pub fn check_about(&self, body: &str) -> Result<(), FetchError> {
        let about: About = serde_json::from_str(body).map_err(|_| FetchError::InvalidResponse)?;
        match about.kind.as_deref() {
            Some(SUBREDDIT_KIND) => Ok(()),
            _ => Err(FetchError::NotASubreddit),
        }
    }
}
