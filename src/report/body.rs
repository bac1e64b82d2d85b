//! HTML email body rendering.
//!
//! Templates are embedded as raw strings and registered on a bare `Tera`
//! instance, so rendering needs no template directory at run time. Chart
//! images are referenced by their artifact path; the mailer rewrites those
//! references to `cid:` URLs at dispatch time.

use serde::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::configuration::{ReportSettings, SmtpSettings};
use crate::models::TenantReport;

/// Per-tenant report body. Inline styles only: this lands in email
/// clients, which ignore stylesheet blocks.
const REPORT_BODY_TEMPLATE: &str = r#"Hello, <br /><br />
<table style="width: 800px; border-collapse: collapse; border-spacing: 0cm; font-family: 'Courier New', monospace; font-size: 14px;" cellpadding="5">
<tbody>
{%- for service in services %}
<tr><td style="text-align: left; height: 24px; border-bottom: 2px solid black; font-size: 18px; color: #003780;"><strong>&#9881; {{ service.name }}</strong></td></tr>
<tr><td style="text-align: left; height: 24px; font-size: 18px; color: #2b0000; background-color: {{ service.band_color }};">Overall health: {{ service.overall }}%</td></tr>
{%- if service.chart %}
<tr><td style="width: 800px; text-align: center;"><img src="{{ service.chart }}"></td></tr>
{%- endif %}
<tr><td style="text-align: left;"><strong>Service health states occurrence:</strong></td></tr>
{%- for state in service.states %}
<tr><td style="text-align: left;">{{ state.name }}: {{ state.percent }}%</td></tr>
{%- endfor %}
<tr><td>&nbsp;</td></tr>
{%- endfor %}
</tbody>
</table>
{{ signature | safe }}"#;

#[derive(Serialize)]
struct StateContext {
    name: String,
    percent: String,
}

#[derive(Serialize)]
struct ServiceContext {
    name: String,
    overall: String,
    band_color: &'static str,
    chart: Option<String>,
    states: Vec<StateContext>,
}

pub struct BodyRenderer {
    tera: Tera,
    band_ok: f64,
    band_warn: f64,
    signature: String,
}

impl BodyRenderer {
    pub fn new(report: &ReportSettings, smtp: &SmtpSettings) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template("report_body.html.tera", REPORT_BODY_TEMPLATE)?;
        Ok(Self {
            tera,
            band_ok: report.band_ok_percent,
            band_warn: report.band_warn_percent,
            signature: smtp.signature.clone(),
        })
    }

    /// Display banding for the overall-health banner. Independent from the
    /// OK-classification threshold used by the aggregation itself.
    fn band_color(&self, overall: f64) -> &'static str {
        if overall >= self.band_ok {
            "#d9f2d9"
        } else if overall >= self.band_warn {
            "#fff8d9"
        } else {
            "#fcc5c5"
        }
    }

    pub fn render(&self, report: &TenantReport) -> Result<String, tera::Error> {
        let services: Vec<ServiceContext> = report
            .services
            .iter()
            .map(|s| ServiceContext {
                name: s.service.clone(),
                overall: format!("{:.2}", s.summary.overall_healthy_percent),
                band_color: self.band_color(s.summary.overall_healthy_percent),
                chart: s.chart.as_ref().map(|p| p.to_string_lossy().into_owned()),
                states: s
                    .summary
                    .status_distribution
                    .iter()
                    .map(|(name, pct)| StateContext {
                        name: name.clone(),
                        percent: format!("{:.2}", pct),
                    })
                    .collect(),
            })
            .collect();

        let mut context = TeraContext::new();
        context.insert("services", &services);
        context.insert("signature", &self.signature);
        self.tera.render("report_body.html.tera", &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthSummary, ServiceReport};

    fn renderer(band_ok: f64, band_warn: f64) -> BodyRenderer {
        let report = ReportSettings {
            from_days: 11,
            to_days: 1,
            band_ok_percent: band_ok,
            band_warn_percent: band_warn,
        };
        let smtp = SmtpSettings {
            enabled: false,
            server: "127.0.0.1".into(),
            port: 25,
            mail_from: "noreply@example.com".into(),
            subject: "Service health report".into(),
            signature: "<hr><p>automated message</p>".into(),
        };
        BodyRenderer::new(&report, &smtp).unwrap()
    }

    fn tenant_report(overall: f64, chart: Option<&str>) -> TenantReport {
        TenantReport {
            tenant: "acme".into(),
            services: vec![ServiceReport {
                service: "Intune".into(),
                summary: HealthSummary {
                    overall_healthy_percent: overall,
                    status_distribution: vec![
                        ("serviceOperational".into(), overall),
                        ("serviceInterruption".into(), 100.0 - overall),
                    ],
                },
                chart: chart.map(Into::into),
            }],
        }
    }

    #[test]
    fn body_contains_service_figures_and_signature() {
        let html = renderer(97.0, 95.0)
            .render(&tenant_report(98.5, Some("/tmp/img/acme/x_Intune.png")))
            .unwrap();
        assert!(html.contains("Intune"));
        assert!(html.contains("98.50%"));
        assert!(html.contains("serviceInterruption: 1.50%"));
        assert!(html.contains("<img src=\"/tmp/img/acme/x_Intune.png\">"));
        assert!(html.contains("automated message"));
    }

    #[test]
    fn chart_row_is_omitted_when_rendering_failed() {
        let html = renderer(97.0, 95.0)
            .render(&tenant_report(98.5, None))
            .unwrap();
        assert!(!html.contains("<img"));
        assert!(html.contains("98.50%"));
    }

    #[test]
    fn banding_uses_both_thresholds() {
        let r = renderer(97.0, 95.0);
        assert_eq!(r.band_color(99.0), "#d9f2d9");
        assert_eq!(r.band_color(96.0), "#fff8d9");
        assert_eq!(r.band_color(80.0), "#fcc5c5");
    }
}
