//! Report assembly (`report` mode).
//!
//! Pipeline per run: query the report window → group records by tenant and
//! service → aggregate + chart each service → render the HTML body →
//! dispatch. Every stage is a distinct abort point: empty upstream output
//! short-circuits the stages after it, and per-service or per-tenant
//! failures never abort their siblings.

pub mod body;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use sqlx::sqlite::SqlitePool;

use crate::analysis;
use crate::chart;
use crate::configuration::Settings;
use crate::db::{self, PersistenceError};
use crate::mailer::{Mailer, OutgoingReport};
use crate::models::{ServiceReport, StatusRecord, TenantReport};
use crate::severity::SeverityMap;

pub use body::BodyRenderer;

/// Which customers the report covers.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerSelection {
    All,
    Named(String),
}

impl CustomerSelection {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Named(raw.to_string())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Requested customer is absent from configuration; a startup-scope
    /// configuration error, surfaced as a non-zero exit.
    #[error("customer [{0}] not recognized in configuration")]
    UnknownCustomer(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    /// Embedded template failed to parse; programmer error, fatal.
    #[error("report template error: {0}")]
    Template(#[from] tera::Error),
}

/// Assemble and dispatch reports for the selected customers.
///
/// Returns the assembled per-tenant reports (also when individual dispatch
/// attempts failed; those are logged). An empty vector means no email was
/// sent: either no records fell inside the window or no service analysis
/// survived.
pub async fn run_report(
    settings: &Settings,
    pool: &SqlitePool,
    mailer: &dyn Mailer,
    selection: &CustomerSelection,
) -> Result<Vec<TenantReport>, ReportError> {
    let customer_filter = match selection {
        CustomerSelection::All => None,
        CustomerSelection::Named(name) => {
            let tenant = settings
                .tenant(name)
                .ok_or_else(|| ReportError::UnknownCustomer(name.clone()))?;
            Some(tenant.name.clone())
        }
    };

    // QueryData
    let (start, end) = report_window(settings);
    tracing::info!(%start, %end, "obtaining report data");
    let records = db::fetch_window(pool, start, end, customer_filter.as_deref()).await?;
    if records.is_empty() {
        tracing::warn!("no data in the report window, skipping report");
        return Ok(Vec::new());
    }

    // FormatByService
    let grouped = group_records(records);

    // Analyze
    let map = SeverityMap::from_entries(settings.severity.clone());
    let mut reports = Vec::new();
    for (tenant, services) in grouped {
        match analyze_tenant(&tenant, services, &map, settings) {
            Some(report) => reports.push(report),
            None => {
                tracing::warn!(tenant = %tenant, "no usable service analysis, tenant dropped");
            }
        }
    }
    if reports.is_empty() {
        tracing::warn!("no tenant produced a usable report, nothing to send");
        return Ok(Vec::new());
    }

    // AssembleBody + Dispatch
    let renderer = BodyRenderer::new(&settings.report, &settings.smtp)?;
    let stamp = crate::models::now_utc().format("%Y-%m-%d %H:%M");
    for report in &reports {
        let Some(tenant) = settings.tenant(&report.tenant) else {
            tracing::warn!(
                tenant = %report.tenant,
                "tenant has records but no configuration, report not dispatched"
            );
            continue;
        };

        let html_body = match renderer.render(report) {
            Ok(html) => html,
            Err(err) => {
                tracing::error!(tenant = %tenant.name, "cannot render report body: {}", err);
                continue;
            }
        };

        let outgoing = OutgoingReport {
            to: tenant.mail_to.clone(),
            cc: tenant.mail_cc.clone(),
            subject: format!("[{}] {} - {}", tenant.name, settings.smtp.subject, stamp),
            html_body,
            inline_images: report.chart_paths().into_iter().cloned().collect(),
        };

        match mailer.send(&outgoing).await {
            Ok(()) => tracing::info!(tenant = %tenant.name, "report dispatched"),
            Err(err) => {
                tracing::error!(tenant = %tenant.name, "report dispatch failed: {}", err);
            }
        }
    }

    Ok(reports)
}

/// Inclusive window `[today - from_days @ 00:00:00, today - to_days @ 23:59:59]`.
fn report_window(settings: &Settings) -> (NaiveDateTime, NaiveDateTime) {
    let (from_days, to_days) = settings.report.window_days();
    let today = crate::models::now_utc().date();
    let start = (today - Duration::days(from_days)).and_time(NaiveTime::MIN);
    let end =
        (today - Duration::days(to_days)).and_time(NaiveTime::MIN) + Duration::days(1)
            - Duration::seconds(1);
    (start, end)
}

type ServiceSamples = Vec<(String, Vec<(NaiveDateTime, String)>)>;

/// Group window records into per-tenant, per-service ordered sample runs.
/// Relies on the query's (customer, service, timestamp) ordering.
fn group_records(records: Vec<StatusRecord>) -> Vec<(String, ServiceSamples)> {
    let mut grouped: Vec<(String, ServiceSamples)> = Vec::new();
    for record in records {
        let start_tenant = grouped
            .last()
            .map(|(name, _)| *name != record.tenant)
            .unwrap_or(true);
        if start_tenant {
            grouped.push((record.tenant.clone(), Vec::new()));
        }
        if let Some((_, services)) = grouped.last_mut() {
            let start_service = services
                .last()
                .map(|(name, _)| *name != record.service)
                .unwrap_or(true);
            if start_service {
                services.push((record.service.clone(), Vec::new()));
            }
            if let Some((_, samples)) = services.last_mut() {
                samples.push((record.timestamp, record.status));
            }
        }
    }
    grouped
}

/// Aggregate and chart every service of one tenant.
///
/// A failed aggregation drops the service; a failed chart only degrades it
/// to summary-only. Returns `None` when nothing survived.
fn analyze_tenant(
    tenant: &str,
    services: ServiceSamples,
    map: &SeverityMap,
    settings: &Settings,
) -> Option<TenantReport> {
    let mut usable = Vec::new();

    for (service, samples) in services {
        tracing::info!(tenant = %tenant, service = %service, "analyzing service health");

        let summary = match analysis::aggregate(&samples, map) {
            Ok(summary) => summary,
            Err(err) => {
                tracing::warn!(
                    tenant = %tenant,
                    service = %service,
                    "cannot aggregate service health, skipping: {}",
                    err
                );
                continue;
            }
        };

        let rendered = chart::render_status_chart(
            tenant,
            &service,
            &samples,
            map,
            &settings.directories.images,
        );
        let chart = match rendered {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!(
                    tenant = %tenant,
                    service = %service,
                    "cannot create chart, degrading to summary only: {}",
                    err
                );
                None
            }
        };

        usable.push(ServiceReport {
            service,
            summary,
            chart,
        });
    }

    if usable.is_empty() {
        None
    } else {
        Some(TenantReport {
            tenant: tenant.to_string(),
            services: usable,
        })
    }
}
