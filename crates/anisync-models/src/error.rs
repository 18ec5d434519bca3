use thiserror::Error;

use crate::record::MediaKind;
use crate::status::ListStatus;

/// Upstream data could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("media is missing")]
    MissingMedia,
    #[error("status is missing")]
    MissingStatus,
    #[error("title is missing")]
    MissingTitle,
    #[error("id is missing")]
    MissingId,
}

/// Internal status has no equivalent in the target catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("status {status} has no target equivalent for {kind}")]
pub struct StatusMappingError {
    pub status: ListStatus,
    pub kind: MediaKind,
}
