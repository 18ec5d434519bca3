use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{SourceId, TargetId};
use crate::status::ListStatus;
use crate::titles::Titles;

/// The catalog-pair kind processed by a single run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Episodic progress
    Anime,
    /// Chapter and volume progress
    Manga,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Anime => f.write_str("anime"),
            MediaKind::Manga => f.write_str("manga"),
        }
    }
}

/// Capability set shared by every normalized list entry.
///
/// The matcher, comparator, resolver and orchestrator only ever talk to
/// records through this trait.
pub trait Record: fmt::Debug + Send + Sync {
    fn kind(&self) -> MediaKind;

    fn target_id(&self) -> TargetId;

    fn source_id(&self) -> SourceId;

    fn titles(&self) -> &Titles;

    fn status(&self) -> ListStatus;

    fn score(&self) -> f64;

    /// Episodes watched or chapters read
    fn progress(&self) -> u32;

    /// Volumes read. Always zero for episodic media.
    fn progress_secondary(&self) -> u32 {
        0
    }

    /// Total episodes or chapters, `0` when unknown
    fn total(&self) -> u32;

    fn started_at(&self) -> Option<NaiveDate>;

    fn finished_at(&self) -> Option<NaiveDate>;

    /// Status in the kind's own vocabulary ("watching", "plan_to_read", ...)
    fn status_label(&self) -> &str {
        self.status().label(self.kind())
    }

    fn display_title(&self) -> &str {
        self.titles().display()
    }
}
