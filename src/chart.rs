//! Status-over-time chart rendering.
//!
//! One PNG per (tenant, service) per report run. Severity score is plotted
//! as a step function: a status holds until the next observation, so the
//! line steps *after* each sample rather than interpolating between them.
//! Y ticks carry the raw status strings in the severity map's declared
//! order, keeping visual ordering aligned with operational priority.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use plotters::prelude::*;

use crate::severity::SeverityMap;

/// Steelblue, matching the report's table accents.
const LINE_COLOR: RGBColor = RGBColor(70, 130, 180);

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no samples to plot")]
    NoSamples,
    #[error("cannot prepare chart directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("chart rendering failed: {0}")]
    Draw(String),
}

/// Render the step chart and return the artifact path.
///
/// The file lands at `<images_dir>/<tenant>/<run timestamp>_<service>.png`;
/// the run-timestamp prefix keeps artifacts from different report runs from
/// colliding. Failures here are non-fatal to the report; callers degrade
/// to the numeric summary.
pub fn render_status_chart(
    tenant: &str,
    service: &str,
    samples: &[(NaiveDateTime, String)],
    map: &SeverityMap,
    images_dir: &Path,
) -> Result<PathBuf, RenderError> {
    if samples.is_empty() {
        return Err(RenderError::NoSamples);
    }

    let tenant_dir = images_dir.join(tenant);
    std::fs::create_dir_all(&tenant_dir)?;

    let stamp = crate::models::now_utc().format("%Y-%m-%d_%H-%M-%S");
    let path = tenant_dir.join(format!("{stamp}_{service}.png"));

    let scored: Vec<(NaiveDateTime, i64)> = samples
        .iter()
        .map(|(ts, status)| (*ts, map.score_of(status)))
        .collect();

    // Step-after: repeat the previous score at each new timestamp before
    // stepping to the new value.
    let mut steps: Vec<(NaiveDateTime, i64)> = Vec::with_capacity(scored.len() * 2);
    for (i, &(ts, score)) in scored.iter().enumerate() {
        steps.push((ts, score));
        if let Some(&(next_ts, _)) = scored.get(i + 1) {
            steps.push((next_ts, score));
        }
    }

    let mut x_start = scored[0].0;
    let mut x_end = scored[scored.len() - 1].0;
    if x_start == x_end {
        // A single observation still needs a non-degenerate axis.
        x_start = x_start - chrono::Duration::hours(1);
        x_end = x_end + chrono::Duration::hours(1);
    }
    let y_end = map.max_score() + 1;

    let root = BitMapBackend::new(&path, (1000, 400)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| RenderError::Draw(e.to_string()))?;

    // plotters 0.3 provides `AsRangedCoord` for `Range<NaiveDate>`/`Range<DateTime<Tz>>`
    // but not for `Range<NaiveDateTime>`; convert into the `RangedDateTime` coord explicitly.
    let x_range: RangedDateTime<NaiveDateTime> = (x_start..x_end).into();

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{service} status history"), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(180)
        .build_cartesian_2d(x_range, -1i64..y_end)
        .map_err(|e| RenderError::Draw(e.to_string()))?;

    chart
        .configure_mesh()
        .light_line_style(&RGBColor(220, 220, 220))
        .y_labels((y_end + 2) as usize)
        .y_label_formatter(&|score| {
            map.label_for_score(*score).unwrap_or_default().to_string()
        })
        .x_label_formatter(&|ts| ts.format("%m-%d %H:%M").to_string())
        .draw()
        .map_err(|e| RenderError::Draw(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(steps, &LINE_COLOR).point_size(2))
        .map_err(|e| RenderError::Draw(e.to_string()))?;

    root.present().map_err(|e| RenderError::Draw(e.to_string()))?;
    // Release the chart/backend borrows of `path` before returning it.
    drop(chart);
    drop(root);

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    fn samples() -> Vec<(NaiveDateTime, String)> {
        vec![
            (
                parse_timestamp("2026-03-01 00:00:00").unwrap(),
                "serviceOperational".to_string(),
            ),
            (
                parse_timestamp("2026-03-01 06:00:00").unwrap(),
                "serviceInterruption".to_string(),
            ),
            (
                parse_timestamp("2026-03-01 12:00:00").unwrap(),
                "resolved".to_string(),
            ),
        ]
    }

    #[test]
    fn renders_png_artifact() {
        let dir = tempfile::TempDir::new().unwrap();
        let map = SeverityMap::default();
        let path = render_status_chart("acme", "Intune", &samples(), &map, dir.path()).unwrap();
        assert!(path.exists());
        assert!(path.metadata().unwrap().len() > 0);
        assert!(path.to_string_lossy().ends_with("_Intune.png"));
        assert!(path.parent().unwrap().ends_with("acme"));
    }

    #[test]
    fn single_sample_still_renders() {
        let dir = tempfile::TempDir::new().unwrap();
        let map = SeverityMap::default();
        let one = vec![samples().remove(0)];
        let path = render_status_chart("acme", "Intune", &one, &map, dir.path()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn empty_samples_are_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let map = SeverityMap::default();
        let err = render_status_chart("acme", "Intune", &[], &map, dir.path()).unwrap_err();
        assert!(matches!(err, RenderError::NoSamples));
    }

    #[test]
    fn unwritable_directory_is_an_error_not_a_panic() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let map = SeverityMap::default();
        let err = render_status_chart("acme", "Intune", &samples(), &map, &blocker).unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
