use anisync_models::{ListUpdate, Record, TargetId};
use anisync_sources::{SourceCatalog, SourceError, TargetCatalog};
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::progress::{diff, is_equivalent};
use crate::resolver::{resolve, TargetIndex};
use crate::stats::SyncStatistics;

/// Run-level policy, passed in once and never read from global state
#[derive(Debug, Clone, Serialize)]
pub struct SyncOptions {
    /// Skip resolution and comparison; push every record using its own target id
    pub force_sync: bool,
    /// Decide everything but never dispatch an update
    pub dry_run: bool,
    /// Lower-cased display titles that are never processed
    pub ignore_titles: HashSet<String>,
    /// Per-record trace logging at info level
    pub verbose: bool,
    pub search_limit: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force_sync: false,
            dry_run: false,
            ignore_titles: HashSet::new(),
            verbose: false,
            search_limit: 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// A bulk snapshot could not be fetched, so there is no baseline to sync against
    #[error("failed to fetch {catalog} list: {source}")]
    Fetch {
        catalog: String,
        #[source]
        source: SourceError,
    },

    #[error("sync cancelled while fetching lists")]
    Cancelled,
}

/// Terminal state of one source record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    Ignored,
    Unresolved,
    AlreadyEquivalent,
    /// Would have been updated, suppressed by dry-run
    DryRun,
    Updated,
    /// Update could not be built or dispatched; not retried
    Failed,
    /// Reached the update step after cancellation was requested
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    pub title: String,
    pub target_id: TargetId,
    pub outcome: RecordOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub statistics: SyncStatistics,
    pub would_update: usize,
    pub cancelled: bool,
    pub records: Vec<RecordReport>,
}

impl SyncReport {
    fn record(&mut self, title: &str, target_id: TargetId, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Ignored | RecordOutcome::Unresolved | RecordOutcome::AlreadyEquivalent => {
                self.statistics.skipped += 1;
            }
            RecordOutcome::Updated => self.statistics.updated += 1,
            RecordOutcome::DryRun => self.would_update += 1,
            RecordOutcome::Failed => {}
            RecordOutcome::Cancelled => self.cancelled = true,
        }
        self.records.push(RecordReport {
            title: title.to_string(),
            target_id,
            outcome,
        });
    }
}

/// Drives the per-record decision loop against one target catalog.
///
/// Records are handled strictly one at a time; each update is a single call
/// issued in full or not at all.
pub struct SyncOrchestrator<'a, R: Record + 'static> {
    target: &'a dyn TargetCatalog<R>,
    options: SyncOptions,
}

impl<'a, R> SyncOrchestrator<'a, R>
where
    R: Record + Clone + 'static,
{
    pub fn new(target: &'a dyn TargetCatalog<R>, options: SyncOptions) -> Self {
        Self { target, options }
    }

    /// Fetch both snapshots and run the loop
    pub async fn sync(
        &self,
        source: &dyn SourceCatalog<R>,
        cancel: &CancellationToken,
    ) -> Result<SyncReport, SyncError> {
        let (sources, targets) = self.fetch_snapshots(source, cancel).await?;
        Ok(self.run(sources, targets, cancel).await)
    }

    /// Bulk-fetch the source list and, unless forced, the target list.
    /// Either failure is fatal to the run.
    pub async fn fetch_snapshots(
        &self,
        source: &dyn SourceCatalog<R>,
        cancel: &CancellationToken,
    ) -> Result<(Vec<R>, Vec<R>), SyncError> {
        let sources = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SyncError::Cancelled),
            result = source.fetch_all() => result.map_err(|e| SyncError::Fetch {
                catalog: source.catalog_name().to_string(),
                source: e,
            })?,
        };

        let targets = if self.options.force_sync {
            Vec::new()
        } else {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SyncError::Cancelled),
                result = self.target.fetch_all() => result.map_err(|e| SyncError::Fetch {
                    catalog: self.target.catalog_name().to_string(),
                    source: e,
                })?,
            }
        };

        Ok((sources, targets))
    }

    /// Reconcile already-fetched snapshots
    pub async fn run(&self, sources: Vec<R>, targets: Vec<R>, cancel: &CancellationToken) -> SyncReport {
        let index = TargetIndex::new(targets);
        let mut report = SyncReport::default();
        let mut current_status = String::new();

        debug!("Reconciling {} source records against {} known targets", sources.len(), index.len());
        if index.is_empty() && !self.options.force_sync && !sources.is_empty() {
            debug!("Target list is empty, every record will be looked up or searched");
        }

        for (position, record) in sources.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!("Sync cancelled, {} records left unprocessed", sources.len() - position);
                report.cancelled = true;
                break;
            }

            // Catalog conversion already rejects a missing status; this keeps
            // any other Record impl with an empty label out of the totals
            if record.status_label().is_empty() {
                continue;
            }

            report.statistics.total += 1;

            if current_status != record.status_label() {
                current_status = record.status_label().to_string();
                info!("[{}] Processing for status: {}", record.kind(), current_status);
            }

            self.trace(format_args!("[{}] Processing for: {:?}", record.kind(), record));

            let (target_id, outcome) = self.process(record, &index, cancel).await;
            report.record(record.display_title(), target_id, outcome);
        }

        if self.options.dry_run && report.would_update > 0 {
            info!("Dry run: {} records would be updated", report.would_update);
        }

        report
    }

    async fn process(
        &self,
        record: &R,
        index: &TargetIndex<R>,
        cancel: &CancellationToken,
    ) -> (TargetId, RecordOutcome) {
        let kind = record.kind();
        let title = record.display_title();

        if self.options.ignore_titles.contains(&title.to_lowercase()) {
            info!("[{}] Ignoring {}: {}", kind, kind, title);
            return (record.target_id(), RecordOutcome::Ignored);
        }

        let target_id = if self.options.force_sync {
            let id = record.target_id();
            if !id.is_known() {
                warn!("[{}] Forced sync needs a known target id, skipping update for {}", kind, title);
                return (id, RecordOutcome::Failed);
            }
            id
        } else {
            let (target, how) = match resolve(record, index, self.target, self.options.search_limit).await {
                Ok(resolved) => resolved,
                Err(e) => {
                    warn!("[{}] Error processing target {}: {}", kind, kind, e);
                    return (record.target_id(), RecordOutcome::Unresolved);
                }
            };

            self.trace(format_args!("[{}] Target ({:?}): {:?}", kind, how, target));

            if is_equivalent(record, &target) {
                return (target.target_id(), RecordOutcome::AlreadyEquivalent);
            }

            info!("[{}] Title: {}", kind, title);
            info!(
                "[{}] Progress is not same, need to update: {}",
                kind,
                diff(record, &target)
            );
            target.target_id()
        };

        if self.options.dry_run {
            info!("[{}] Dry run: Skipping update for {} {}", kind, kind, title);
            return (target_id, RecordOutcome::DryRun);
        }

        let update = match ListUpdate::from_record(record) {
            Ok(update) => update,
            Err(e) => {
                warn!("[{}] Cannot build update for {}: {}", kind, title, e);
                return (target_id, RecordOutcome::Failed);
            }
        };

        if cancel.is_cancelled() {
            return (target_id, RecordOutcome::Cancelled);
        }

        self.trace(format_args!("[{}] Updating {}", kind, title));

        match self.target.apply_update(target_id, &update).await {
            Ok(()) => {
                info!("[{}] Updated {}", kind, title);
                (target_id, RecordOutcome::Updated)
            }
            Err(e) => {
                warn!("[{}] Error updating target: {}: {}", kind, title, e);
                (target_id, RecordOutcome::Failed)
            }
        }
    }

    fn trace(&self, message: std::fmt::Arguments<'_>) {
        if self.options.verbose {
            info!("{}", message);
        } else {
            debug!("{}", message);
        }
    }
}
