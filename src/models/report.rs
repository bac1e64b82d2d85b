use std::path::PathBuf;

use crate::models::HealthSummary;

/// Analysis result for one service within a tenant's report.
///
/// `chart` is `None` when rendering failed or was skipped; the report then
/// degrades to the numeric summary alone.
#[derive(Debug, Clone)]
pub struct ServiceReport {
    pub service: String,
    pub summary: HealthSummary,
    pub chart: Option<PathBuf>,
}

/// Assembled per-tenant report, ready for HTML formatting and dispatch.
///
/// Invariant: `services` is non-empty: tenants with zero usable service
/// results are dropped by the assembler before this type is constructed.
#[derive(Debug, Clone)]
pub struct TenantReport {
    pub tenant: String,
    pub services: Vec<ServiceReport>,
}

impl TenantReport {
    /// Chart artifact paths across all services, for mail attachment.
    pub fn chart_paths(&self) -> Vec<&PathBuf> {
        self.services.iter().filter_map(|s| s.chart.as_ref()).collect()
    }
}
