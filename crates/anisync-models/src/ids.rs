use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier in the target catalog's namespace (MyAnimeList).
///
/// `0` (or anything non-positive) means the record has not been resolved yet.
/// Deliberately a distinct type from [`SourceId`] so the two namespaces can
/// never be compared.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TargetId(pub i64);

impl TargetId {
    pub const UNKNOWN: TargetId = TargetId(0);

    pub fn is_known(self) -> bool {
        self.0 > 0
    }
}

impl From<i64> for TargetId {
    fn from(id: i64) -> Self {
        TargetId(id)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier in the source catalog's namespace (AniList).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SourceId(pub i64);

impl SourceId {
    pub const UNKNOWN: SourceId = SourceId(0);

    pub fn is_known(self) -> bool {
        self.0 > 0
    }
}

impl From<i64> for SourceId {
    fn from(id: i64) -> Self {
        SourceId(id)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_id_known() {
        assert!(!TargetId::UNKNOWN.is_known());
        assert!(!TargetId(-1).is_known());
        assert!(TargetId(52991).is_known());
    }

    #[test]
    fn test_ids_serialize_as_plain_integers() {
        assert_eq!(serde_json::to_string(&TargetId(5)).unwrap(), "5");
        let id: SourceId = serde_json::from_str("154587").unwrap();
        assert_eq!(id, SourceId(154587));
    }
}
