//! Health-percentage aggregation.
//!
//! Turns one service's ordered status samples into a `HealthSummary`:
//! overall percentage of OK samples plus per-status occurrence shares.

use chrono::NaiveDateTime;

use crate::models::HealthSummary;
use crate::severity::{SeverityMap, OK_THRESHOLD};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AnalysisError {
    /// No samples for the service in the report window. A reportable
    /// condition, not a crash; callers skip the service and continue.
    #[error("no status samples to aggregate")]
    EmptyDataset,
}

/// Aggregate one service's `(timestamp, status)` samples.
///
/// Overall health counts samples whose severity score meets
/// [`OK_THRESHOLD`]; the distribution counts raw status occurrences. Both
/// are computed over the same sample set, so distribution entries sum to
/// 100 within float tolerance. No rounding happens here.
pub fn aggregate(
    samples: &[(NaiveDateTime, String)],
    map: &SeverityMap,
) -> Result<HealthSummary, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let total = samples.len() as f64;

    let ok_count = samples
        .iter()
        .filter(|(_, status)| map.score_of(status) >= OK_THRESHOLD)
        .count();

    // Occurrence counts in first-observation order, so the report renders
    // statuses in the order they appeared.
    let mut distribution: Vec<(String, usize)> = Vec::new();
    for (_, status) in samples {
        match distribution.iter_mut().find(|(name, _)| name == status) {
            Some((_, count)) => *count += 1,
            None => distribution.push((status.clone(), 1)),
        }
    }

    Ok(HealthSummary {
        overall_healthy_percent: ok_count as f64 / total * 100.0,
        status_distribution: distribution
            .into_iter()
            .map(|(status, count)| (status, count as f64 / total * 100.0))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    fn samples(statuses: &[&str]) -> Vec<(NaiveDateTime, String)> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let ts = parse_timestamp(&format!("2026-03-01 {:02}:00:00", i)).unwrap();
                (ts, s.to_string())
            })
            .collect()
    }

    #[test]
    fn empty_input_is_a_typed_condition() {
        let map = SeverityMap::default();
        assert_eq!(aggregate(&[], &map), Err(AnalysisError::EmptyDataset));
    }

    #[test]
    fn two_of_three_ok_yields_two_thirds() {
        let map = SeverityMap::default();
        let summary = aggregate(
            &samples(&["serviceOperational", "serviceInterruption", "resolved"]),
            &map,
        )
        .unwrap();
        // "resolved" scores 9 and counts as healthy.
        assert!((summary.overall_healthy_percent - 66.666_666).abs() < 0.01);
    }

    #[test]
    fn distribution_sums_to_one_hundred() {
        let map = SeverityMap::default();
        let summary = aggregate(
            &samples(&[
                "serviceOperational",
                "serviceOperational",
                "investigating",
                "serviceInterruption",
                "resolved",
                "resolved",
                "unknown-garbage",
            ]),
            &map,
        )
        .unwrap();
        let total: f64 = summary.status_distribution.iter().map(|(_, p)| p).sum();
        assert!((total - 100.0).abs() < 0.01);
    }

    #[test]
    fn distribution_keeps_first_observation_order() {
        let map = SeverityMap::default();
        let summary = aggregate(
            &samples(&["investigating", "serviceOperational", "investigating"]),
            &map,
        )
        .unwrap();
        let names: Vec<&str> = summary
            .status_distribution
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, vec!["investigating", "serviceOperational"]);
        assert!((summary.percent_of("investigating").unwrap() - 66.666_666).abs() < 0.01);
    }

    #[test]
    fn unknown_statuses_count_as_not_ok() {
        let map = SeverityMap::default();
        let summary = aggregate(&samples(&["unknown-garbage", ""]), &map).unwrap();
        assert_eq!(summary.overall_healthy_percent, 0.0);
    }

    #[test]
    fn all_ok_sequence_is_one_hundred_percent() {
        let map = SeverityMap::default();
        let summary = aggregate(
            &samples(&["serviceOperational", "serviceRestored", "falsePositive"]),
            &map,
        )
        .unwrap();
        assert_eq!(summary.overall_healthy_percent, 100.0);
    }
}
