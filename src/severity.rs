//! Status-to-severity mapping.
//!
//! Every raw status string reported by the health API carries an integer
//! severity score (higher = healthier). The declared order of the entries is
//! meaningful: it drives the y-axis category order on status charts, so the
//! map is kept as an ordered list rather than a hash map.

use serde::Deserialize;

/// Scores at or above this value classify a status as healthy/OK.
///
/// Operational policy: "degraded but serving" still counts as OK for
/// availability percentages. Display banding in reports is configured
/// separately (`ReportSettings`) and must not be conflated with this.
pub const OK_THRESHOLD: i64 = 9;

/// One configured `status -> score` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SeverityEntry {
    pub status: String,
    pub score: i64,
}

/// Ordered mapping from raw status strings to severity scores.
///
/// Loaded once at startup and shared read-only by aggregation and chart
/// rendering. Unknown or empty statuses score 0.
#[derive(Debug, Clone)]
pub struct SeverityMap {
    entries: Vec<SeverityEntry>,
}

impl SeverityMap {
    pub fn new(entries: Vec<SeverityEntry>) -> Self {
        Self { entries }
    }

    /// Build the map from configuration, falling back to the built-in
    /// vocabulary when the config file has no `severity` section.
    pub fn from_entries(entries: Vec<SeverityEntry>) -> Self {
        if entries.is_empty() {
            Self::default()
        } else {
            Self::new(entries)
        }
    }

    /// Score for a raw status string; 0 when unrecognized or empty.
    pub fn score_of(&self, status: &str) -> i64 {
        self.entries
            .iter()
            .find(|e| e.status == status)
            .map(|e| e.score)
            .unwrap_or(0)
    }

    /// Entries in declared order.
    pub fn entries(&self) -> &[SeverityEntry] {
        &self.entries
    }

    /// First declared status carrying the given score.
    ///
    /// Several statuses may share a score; chart ticks collapse to the first
    /// declared label so tick text is deterministic.
    pub fn label_for_score(&self, score: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.score == score)
            .map(|e| e.status.as_str())
    }

    /// Distinct scores in declared order, for chart tick placement.
    pub fn scores(&self) -> Vec<i64> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.score) {
                seen.push(entry.score);
            }
        }
        seen
    }

    /// Highest configured score (chart y-axis upper bound).
    pub fn max_score(&self) -> i64 {
        self.entries.iter().map(|e| e.score).max().unwrap_or(0)
    }
}

impl Default for SeverityMap {
    /// Built-in vocabulary for the Microsoft service-health API, ordered by
    /// operational priority.
    fn default() -> Self {
        let entry = |status: &str, score: i64| SeverityEntry {
            status: status.to_string(),
            score,
        };
        Self::new(vec![
            entry("serviceOperational", 10),
            entry("serviceRestored", 9),
            entry("falsePositive", 9),
            entry("postIncidentReviewPublished", 9),
            entry("resolved", 9),
            entry("resolvedExternal", 9),
            entry("serviceDegradation", 9),
            entry("investigating", 8),
            entry("confirmed", 8),
            entry("reported", 8),
            entry("mitigatedExternal", 7),
            entry("mitigated", 7),
            entry("verifyingService", 6),
            entry("restoringService", 5),
            entry("extendedRecovery", 5),
            entry("serviceInterruption", 4),
            entry("investigationSuspended", 3),
            entry("", 0),
        ])
    }
}
