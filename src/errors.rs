// errors.rs
use thiserror::Error;

/// Failures of a feed request. Always shown in the lane or flow that issued it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Http(u16),

    #[error("Invalid response")]
    InvalidResponse,

    #[error("Not found")]
    NotFound,

    #[error("Not a subreddit")]
    NotASubreddit,

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

/// Problems with the local key-value store. Recovered locally, never fatal.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt store contents: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("No location available for the store")]
    NoLocation,
}

/// Rejected user input in the add-lane flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Subreddit name is empty")]
    Empty,

    #[error("Subreddit already added")]
    Duplicate(String),
}

/// Why a lane list mutation was not applied.
#[derive(Error, Debug)]
pub enum LaneError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Could not save lanes: {0}")]
    Storage(#[from] StorageError),
}
