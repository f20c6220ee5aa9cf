// src/feed.rs
use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

const POST_URL_BASE: &str = "https://reddit.com";

// === FEED IDENTIFIER ===
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedId(String);

impl std::fmt::Display for FeedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for FeedId {
    fn eq(&self, other: &Self) -> bool {
        // Topic names are compared without regard to case
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for FeedId {}

impl FeedId {
    /// Normalizes raw user input: trims, then drops a leading `r/` (any case)
    /// or a leading `/`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let stripped = match trimmed.get(..2) {
            Some(prefix) if prefix.eq_ignore_ascii_case("r/") => &trimmed[2..],
            _ => trimmed,
        };
        let name = stripped.strip_prefix('/').unwrap_or(stripped);

        if name.is_empty() {
            return Err(ValidationError::Empty);
        }
        Ok(FeedId(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for FeedId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FeedId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FeedId::parse(&value)
    }
}

impl From<FeedId> for String {
    fn from(id: FeedId) -> Self {
        id.0
    }
}

// === POST SUMMARY ===
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    title: String,
    author: String,
    score: i64,
    num_comments: u64,
    permalink: String,
}

impl PostSummary {
    pub fn new(
        title: String,
        author: String,
        score: i64,
        num_comments: u64,
        permalink: String,
    ) -> Self {
        Self { title, author, score, num_comments, permalink }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn num_comments(&self) -> u64 {
        self.num_comments
    }

    pub fn permalink(&self) -> &str {
        &self.permalink
    }

    /// Absolute URL of the post's discussion page.
    pub fn url(&self) -> String {
        format!("{}{}", POST_URL_BASE, self.permalink)
    }
}

impl fmt::Display for PostSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "▲ {} {} (by {} • {} comments)",
            self.score, self.title, self.author, self.num_comments
        )
    }
}
