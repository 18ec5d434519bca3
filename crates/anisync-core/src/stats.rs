use serde::Serialize;
use std::fmt;
use tracing::info;

/// Outcome counters for one run. Printed at the end, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatistics {
    /// Records that entered the decision loop
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl SyncStatistics {
    /// Records that were neither updated nor skipped: failed updates, dry-run
    /// candidates and records left behind by cancellation
    pub fn pending(&self) -> usize {
        self.total.saturating_sub(self.updated + self.skipped)
    }

    pub fn log_summary(&self, prefix: &str) {
        info!("[{}] Updated {} out of {}", prefix, self.updated, self.total);
        info!("[{}] Skipped {}", prefix, self.skipped);
    }
}

impl fmt::Display for SyncStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated {} out of {}", self.updated, self.total)?;
        write!(f, "Skipped {}", self.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_line_summary() {
        let stats = SyncStatistics {
            total: 10,
            updated: 3,
            skipped: 6,
        };
        assert_eq!(stats.to_string(), "Updated 3 out of 10\nSkipped 6");
        assert_eq!(stats.pending(), 1);
    }

    #[test]
    fn test_default_is_empty() {
        let stats = SyncStatistics::default();
        assert_eq!(stats.to_string(), "Updated 0 out of 0\nSkipped 0");
        assert_eq!(stats.pending(), 0);
    }
}
