pub mod progress;
pub mod resolver;
pub mod stats;
pub mod sync;
pub mod title_match;

pub use progress::{diff, is_equivalent, FieldChange, ProgressDiff};
pub use resolver::{resolve, Resolution, ResolveError, TargetIndex};
pub use stats::SyncStatistics;
pub use sync::{RecordOutcome, RecordReport, SyncError, SyncOptions, SyncOrchestrator, SyncReport};
pub use title_match::same_work;
