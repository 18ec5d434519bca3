use anisync_models::{ListUpdate, Record, TargetId};
use async_trait::async_trait;

use crate::error::SourceError;

/// The authoritative catalog. Only read from, never written to.
#[async_trait]
pub trait SourceCatalog<R: Record + 'static>: Send + Sync {
    fn catalog_name(&self) -> &str;

    /// Bulk snapshot of the user's list, called once per run.
    /// Entries that fail conversion are dropped and logged, not returned.
    async fn fetch_all(&self) -> Result<Vec<R>, SourceError>;
}

/// The catalog brought into agreement with the source.
#[async_trait]
pub trait TargetCatalog<R: Record + 'static>: Send + Sync {
    fn catalog_name(&self) -> &str;

    /// Bulk snapshot of the user's list, called once per run
    async fn fetch_all(&self) -> Result<Vec<R>, SourceError>;

    /// Single-record lookup. Returns `SourceError::NotFound` when the id does
    /// not exist in the catalog.
    async fn get_by_id(&self, id: TargetId) -> Result<R, SourceError>;

    async fn search_by_title(&self, title: &str, limit: usize) -> Result<Vec<R>, SourceError>;

    /// Push the full field set for one record. Issued as a single call.
    async fn apply_update(&self, id: TargetId, update: &ListUpdate) -> Result<(), SourceError>;
}
