use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{SourceId, TargetId};
use crate::record::{MediaKind, Record};
use crate::status::ListStatus;
use crate::titles::Titles;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manga {
    pub anilist_id: SourceId,
    pub mal_id: TargetId,
    pub titles: Titles,
    pub status: ListStatus,
    pub score: f64,
    /// Chapters read
    pub progress: u32,
    pub progress_volumes: u32,
    pub chapters: u32,
    pub volumes: u32,
    pub started_at: Option<NaiveDate>,
    pub finished_at: Option<NaiveDate>,
}

impl Record for Manga {
    fn kind(&self) -> MediaKind {
        MediaKind::Manga
    }

    fn target_id(&self) -> TargetId {
        self.mal_id
    }

    fn source_id(&self) -> SourceId {
        self.anilist_id
    }

    fn titles(&self) -> &Titles {
        &self.titles
    }

    fn status(&self) -> ListStatus {
        self.status
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn progress(&self) -> u32 {
        self.progress
    }

    fn progress_secondary(&self) -> u32 {
        self.progress_volumes
    }

    fn total(&self) -> u32 {
        self.chapters
    }

    fn started_at(&self) -> Option<NaiveDate> {
        self.started_at
    }

    fn finished_at(&self) -> Option<NaiveDate> {
        self.finished_at
    }
}
