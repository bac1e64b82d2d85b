use serde::Serialize;

/// Derived availability figures for one service over a report window.
///
/// Pure function of a status sequence; never persisted. Values are raw
/// floats; rounding is a presentation concern handled by the report body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    /// Percentage of samples whose severity score met the OK threshold.
    pub overall_healthy_percent: f64,
    /// Per observed status, its share of the sample count in percent.
    /// Entries keep first-observation order so report output is stable.
    pub status_distribution: Vec<(String, f64)>,
}

impl HealthSummary {
    /// Occurrence percentage for one status, if it was observed.
    pub fn percent_of(&self, status: &str) -> Option<f64> {
        self.status_distribution
            .iter()
            .find(|(name, _)| name == status)
            .map(|(_, pct)| *pct)
    }
}
