use anisync_models::Record;
use serde::Serialize;
use std::fmt;

/// Whether the target already agrees with the source, so no update is needed.
///
/// Status and score must be identical. Score uses exact float equality.
/// Progress is compared against the totals: when both catalogs know a total
/// and disagree on it, matching remaining counts are accepted as equivalent.
pub fn is_equivalent<S, T>(source: &S, target: &T) -> bool
where
    S: Record + ?Sized,
    T: Record + ?Sized,
{
    if source.status() != target.status() {
        return false;
    }
    if source.score() != target.score() {
        return false;
    }
    if !same_progress(source, target) {
        return false;
    }
    source.progress_secondary() == target.progress_secondary()
}

fn same_progress<S, T>(source: &S, target: &T) -> bool
where
    S: Record + ?Sized,
    T: Record + ?Sized,
{
    let progress_equal = source.progress() == target.progress();
    let (total_source, total_target) = (source.total(), target.total());

    if total_source == total_target || total_source == 0 || total_target == 0 {
        return progress_equal;
    }
    if progress_equal {
        return true;
    }

    let remaining_source = total_source as i64 - source.progress() as i64;
    let remaining_target = total_target as i64 - target.progress() as i64;
    remaining_source == remaining_target
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub from: String,
    pub to: String,
}

/// Every field that differs between a source and its target, for operator visibility
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressDiff {
    pub changes: Vec<FieldChange>,
}

impl ProgressDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.changes.iter().map(|c| c.field).collect()
    }

    fn push_if_differs<V: PartialEq + fmt::Display>(&mut self, field: &'static str, from: V, to: V) {
        if from != to {
            self.changes.push(FieldChange {
                field,
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }
}

impl fmt::Display for ProgressDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .changes
            .iter()
            .map(|c| format!("{}: {} -> {}", c.field, c.from, c.to))
            .collect();
        write!(f, "Diff{{{}}}", parts.join(", "))
    }
}

/// Report differing fields as `source -> target`, independent of equivalence
pub fn diff<S, T>(source: &S, target: &T) -> ProgressDiff
where
    S: Record + ?Sized,
    T: Record + ?Sized,
{
    let mut diff = ProgressDiff::default();
    diff.push_if_differs("Status", source.status(), target.status());
    diff.push_if_differs("Score", source.score(), target.score());
    diff.push_if_differs("Progress", source.progress(), target.progress());
    diff.push_if_differs("Total", source.total(), target.total());
    diff.push_if_differs(
        "ProgressVolumes",
        source.progress_secondary(),
        target.progress_secondary(),
    );
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use anisync_models::{Anime, ListStatus, Manga, SourceId, TargetId, Titles};

    fn anime(progress: u32, total: u32) -> Anime {
        Anime {
            anilist_id: SourceId(1),
            mal_id: TargetId(1),
            titles: Titles::new("Frieren: Beyond Journey's End", "", ""),
            status: ListStatus::Current,
            score: 9.0,
            progress,
            num_episodes: total,
            season_year: None,
            started_at: None,
            finished_at: None,
        }
    }

    #[test]
    fn test_equivalence_is_reflexive() {
        let records = [anime(0, 0), anime(5, 12), anime(12, 12), anime(30, 28)];
        for record in &records {
            assert!(is_equivalent(record, record));
            assert!(diff(record, record).is_empty());
        }
    }

    #[test]
    fn test_status_mismatch() {
        let source = anime(5, 12);
        let mut target = anime(5, 12);
        target.status = ListStatus::OnHold;
        assert!(!is_equivalent(&source, &target));
    }

    #[test]
    fn test_score_uses_exact_equality() {
        let source = anime(5, 12);
        let mut target = anime(5, 12);
        target.score = 9.05;
        assert!(!is_equivalent(&source, &target));
    }

    #[test]
    fn test_equal_totals_compare_progress() {
        assert!(is_equivalent(&anime(5, 12), &anime(5, 12)));
        assert!(!is_equivalent(&anime(5, 12), &anime(6, 12)));
    }

    #[test]
    fn test_unknown_total_compares_progress() {
        assert!(is_equivalent(&anime(5, 0), &anime(5, 12)));
        assert!(is_equivalent(&anime(5, 12), &anime(5, 0)));
        assert!(!is_equivalent(&anime(4, 0), &anime(5, 12)));
    }

    #[test]
    fn test_same_progress_with_different_totals() {
        assert!(is_equivalent(&anime(7, 12), &anime(7, 13)));
    }

    #[test]
    fn test_remainder_fallback() {
        assert!(is_equivalent(&anime(10, 12), &anime(11, 13)));
        assert!(!is_equivalent(&anime(10, 12), &anime(10 + 2, 13)));
    }

    #[test]
    fn test_remainder_with_progress_past_total() {
        // Remaining counts may go negative without wrapping
        assert!(is_equivalent(&anime(14, 12), &anime(15, 13)));
        assert!(!is_equivalent(&anime(14, 12), &anime(0, 13)));
    }

    #[test]
    fn test_manga_volumes_must_match() {
        let source = Manga {
            anilist_id: SourceId(1),
            mal_id: TargetId(2),
            titles: Titles::new("Berserk", "", ""),
            status: ListStatus::Current,
            score: 10.0,
            progress: 364,
            progress_volumes: 41,
            chapters: 0,
            volumes: 0,
            started_at: None,
            finished_at: None,
        };
        let mut target = source.clone();
        target.progress_volumes = 40;

        assert!(!is_equivalent(&source, &target));
        assert_eq!(diff(&source, &target).fields(), vec!["ProgressVolumes"]);
    }

    #[test]
    fn test_diff_reports_every_differing_field() {
        let source = anime(28, 28);
        let mut target = anime(0, 0);
        target.status = ListStatus::Planning;
        target.score = 0.0;

        let diff = diff(&source, &target);
        assert_eq!(diff.fields(), vec!["Status", "Score", "Progress", "Total"]);
        assert_eq!(
            diff.to_string(),
            "Diff{Status: current -> planning, Score: 9 -> 0, Progress: 28 -> 0, Total: 28 -> 0}"
        );
    }

    #[test]
    fn test_diff_ignores_equivalence_shortcuts() {
        // Equivalent through the unknown-total rule, but the totals still differ
        let diff = diff(&anime(5, 0), &anime(5, 12));
        assert_eq!(diff.fields(), vec!["Total"]);
    }
}
