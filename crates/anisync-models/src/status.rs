use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StatusMappingError;
use crate::record::MediaKind;

/// Normalized list status shared by both catalogs
///
/// Each catalog encodes these with its own strings; the mappings below are
/// total and fall back to `Unknown` for anything unrecognized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    /// Watching / reading
    Current,
    Completed,
    OnHold,
    Dropped,
    /// Plan to watch / plan to read
    Planning,
    Unknown,
}

impl ListStatus {
    /// Map an AniList `MediaListStatus` value.
    ///
    /// `REPEATING` is folded into `Current`. This loses the rewatch/reread
    /// state and is a known approximation kept for behavioural compatibility.
    pub fn from_anilist(value: &str) -> Self {
        match value {
            "CURRENT" => ListStatus::Current,
            "COMPLETED" => ListStatus::Completed,
            "PAUSED" => ListStatus::OnHold,
            "DROPPED" => ListStatus::Dropped,
            "PLANNING" => ListStatus::Planning,
            "REPEATING" => ListStatus::Current,
            _ => ListStatus::Unknown,
        }
    }

    /// Map a MyAnimeList list status for the given media kind.
    pub fn from_myanimelist(value: &str, kind: MediaKind) -> Self {
        match (value, kind) {
            ("watching", MediaKind::Anime) | ("reading", MediaKind::Manga) => ListStatus::Current,
            ("completed", _) => ListStatus::Completed,
            ("on_hold", _) => ListStatus::OnHold,
            ("dropped", _) => ListStatus::Dropped,
            ("plan_to_watch", MediaKind::Anime) | ("plan_to_read", MediaKind::Manga) => ListStatus::Planning,
            _ => ListStatus::Unknown,
        }
    }

    /// MyAnimeList vocabulary for this status. `Unknown` has no equivalent.
    pub fn to_myanimelist(self, kind: MediaKind) -> Result<&'static str, StatusMappingError> {
        match (self, kind) {
            (ListStatus::Current, MediaKind::Anime) => Ok("watching"),
            (ListStatus::Current, MediaKind::Manga) => Ok("reading"),
            (ListStatus::Completed, _) => Ok("completed"),
            (ListStatus::OnHold, _) => Ok("on_hold"),
            (ListStatus::Dropped, _) => Ok("dropped"),
            (ListStatus::Planning, MediaKind::Anime) => Ok("plan_to_watch"),
            (ListStatus::Planning, MediaKind::Manga) => Ok("plan_to_read"),
            (ListStatus::Unknown, _) => Err(StatusMappingError { status: self, kind }),
        }
    }

    /// Human-readable label in the vocabulary of the media kind
    pub fn label(self, kind: MediaKind) -> &'static str {
        match (self, kind) {
            (ListStatus::Current, MediaKind::Anime) => "watching",
            (ListStatus::Current, MediaKind::Manga) => "reading",
            (ListStatus::Completed, _) => "completed",
            (ListStatus::OnHold, _) => "on_hold",
            (ListStatus::Dropped, _) => "dropped",
            (ListStatus::Planning, MediaKind::Anime) => "plan_to_watch",
            (ListStatus::Planning, MediaKind::Manga) => "plan_to_read",
            (ListStatus::Unknown, _) => "unknown",
        }
    }
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ListStatus::Current => "current",
            ListStatus::Completed => "completed",
            ListStatus::OnHold => "on_hold",
            ListStatus::Dropped => "dropped",
            ListStatus::Planning => "planning",
            ListStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anilist_mapping() {
        assert_eq!(ListStatus::from_anilist("CURRENT"), ListStatus::Current);
        assert_eq!(ListStatus::from_anilist("COMPLETED"), ListStatus::Completed);
        assert_eq!(ListStatus::from_anilist("PAUSED"), ListStatus::OnHold);
        assert_eq!(ListStatus::from_anilist("DROPPED"), ListStatus::Dropped);
        assert_eq!(ListStatus::from_anilist("PLANNING"), ListStatus::Planning);
        assert_eq!(ListStatus::from_anilist("something"), ListStatus::Unknown);
        assert_eq!(ListStatus::from_anilist(""), ListStatus::Unknown);
    }

    #[test]
    fn test_anilist_repeating_is_approximated_as_current() {
        // Known approximation: the rewatch state is not preserved.
        assert_eq!(ListStatus::from_anilist("REPEATING"), ListStatus::Current);
    }

    #[test]
    fn test_myanimelist_mapping_is_kind_specific() {
        assert_eq!(ListStatus::from_myanimelist("watching", MediaKind::Anime), ListStatus::Current);
        assert_eq!(ListStatus::from_myanimelist("reading", MediaKind::Manga), ListStatus::Current);
        assert_eq!(ListStatus::from_myanimelist("reading", MediaKind::Anime), ListStatus::Unknown);
        assert_eq!(ListStatus::from_myanimelist("plan_to_read", MediaKind::Manga), ListStatus::Planning);
        assert_eq!(ListStatus::from_myanimelist("plan_to_watch", MediaKind::Manga), ListStatus::Unknown);
        assert_eq!(ListStatus::from_myanimelist("", MediaKind::Anime), ListStatus::Unknown);
    }

    #[test]
    fn test_to_myanimelist() {
        assert_eq!(ListStatus::Current.to_myanimelist(MediaKind::Anime).unwrap(), "watching");
        assert_eq!(ListStatus::Current.to_myanimelist(MediaKind::Manga).unwrap(), "reading");
        assert_eq!(ListStatus::Planning.to_myanimelist(MediaKind::Manga).unwrap(), "plan_to_read");
        assert_eq!(ListStatus::OnHold.to_myanimelist(MediaKind::Anime).unwrap(), "on_hold");

        let err = ListStatus::Unknown.to_myanimelist(MediaKind::Anime).unwrap_err();
        assert_eq!(err.status, ListStatus::Unknown);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ListStatus::Planning.label(MediaKind::Anime), "plan_to_watch");
        assert_eq!(ListStatus::Planning.label(MediaKind::Manga), "plan_to_read");
        assert_eq!(ListStatus::Unknown.label(MediaKind::Manga), "unknown");
    }
}
