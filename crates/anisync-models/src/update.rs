use chrono::NaiveDate;
use serde::Serialize;

use crate::error::StatusMappingError;
use crate::record::{MediaKind, Record};
use crate::status::ListStatus;

/// A date option sent with every update. `Unset` clears a previously stored date
/// on the target, so it is always sent rather than omitted.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DateField {
    Set(NaiveDate),
    Unset,
}

impl DateField {
    /// Wire value: `YYYY-MM-DD`, or an empty string to clear
    pub fn to_form_value(&self) -> String {
        match self {
            DateField::Set(date) => date.format("%Y-%m-%d").to_string(),
            DateField::Unset => String::new(),
        }
    }
}

/// Full field set pushed to the target for one record
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListUpdate {
    pub kind: MediaKind,
    /// Status in the target catalog's vocabulary
    pub status: &'static str,
    pub score: f64,
    pub progress: u32,
    /// Volumes read, only present for manga
    pub progress_secondary: Option<u32>,
    pub start_date: DateField,
    pub finish_date: DateField,
}

impl ListUpdate {
    /// Build the update command from a source record.
    ///
    /// Fails when the record's status has no target equivalent; the caller must
    /// then abort that record's update instead of guessing.
    pub fn from_record<R: Record + ?Sized>(record: &R) -> Result<Self, StatusMappingError> {
        let kind = record.kind();
        let status = record.status().to_myanimelist(kind)?;

        let progress_secondary = match kind {
            MediaKind::Manga => Some(record.progress_secondary()),
            MediaKind::Anime => None,
        };

        let start_date = match record.started_at() {
            Some(date) => DateField::Set(date),
            None => DateField::Unset,
        };

        let finish_date = match (record.status(), record.finished_at()) {
            (ListStatus::Completed, Some(date)) => DateField::Set(date),
            _ => DateField::Unset,
        };

        Ok(Self {
            kind,
            status,
            score: record.score(),
            progress: record.progress(),
            progress_secondary,
            start_date,
            finish_date,
        })
    }
}
