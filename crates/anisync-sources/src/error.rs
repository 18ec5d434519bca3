use anisync_models::{ConversionError, TargetId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The catalog has no record reachable by the given id or query
    #[error("not found: {0}")]
    NotFound(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not authenticated with {0}, run `anisync auth {0}` first")]
    NotAuthenticated(String),

    #[error("invalid target id {0}")]
    InvalidId(TargetId),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("authentication failed: {0}")]
    Auth(String),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }
}
