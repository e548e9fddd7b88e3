use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Failure of a listing or detail request.
///
/// Carried inside actions, so it stays cloneable and serializable instead of
/// wrapping `reqwest::Error` directly.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("response parse error: {0}")]
    Parse(String),
    #[error("fetch task failed: {0}")]
    Task(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    #[error("no entry at position {index} (collection holds {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("entry {index} has no detail yet")]
    Unresolved { index: usize },
}
