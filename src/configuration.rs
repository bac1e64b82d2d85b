use serde;

use crate::severity::SeverityEntry;

#[derive(Debug, serde::Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub directories: DirectorySettings,
    pub api: ApiSettings,
    /// Rolling retention window in days; records older than this are pruned
    /// after each successful scan cycle.
    pub retention_days: i64,
    pub report: ReportSettings,
    pub smtp: SmtpSettings,
    pub customers: Vec<TenantConfig>,
    /// Optional override of the built-in status vocabulary; order matters
    /// (it drives chart y-axis category order).
    #[serde(default)]
    pub severity: Vec<SeverityEntry>,
}

#[derive(Debug, serde::Deserialize)]
pub struct DatabaseSettings {
    pub path: std::path::PathBuf,
}

#[derive(Debug, serde::Deserialize)]
pub struct DirectorySettings {
    /// Chart artifacts land under `<images>/<tenant>/`.
    pub images: std::path::PathBuf,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiSettings {
    /// Identity provider base URL; the tenant directory id is appended.
    pub auth_endpoint: String,
    /// Health-overview endpoint (authenticated GET).
    pub health_endpoint: String,
    /// OAuth scope requested in the client-credential exchange.
    pub scope: String,
    /// Bound on every remote call so an unresponsive service cannot hang
    /// the poll cycle.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, serde::Deserialize)]
pub struct ReportSettings {
    /// Window start: days before today (inclusive, at 00:00:00).
    pub from_days: i64,
    /// Window end: days before today (inclusive, at 23:59:59).
    pub to_days: i64,
    /// Display banding only; independent from the healthy-classification
    /// threshold in `severity::OK_THRESHOLD`.
    #[serde(default = "default_band_ok")]
    pub band_ok_percent: f64,
    #[serde(default = "default_band_warn")]
    pub band_warn_percent: f64,
}

fn default_band_ok() -> f64 {
    97.0
}

fn default_band_warn() -> f64 {
    95.0
}

impl ReportSettings {
    /// Window offsets, falling back to the single prior calendar day when
    /// misordered (`from` must not be closer to now than `to`).
    pub fn window_days(&self) -> (i64, i64) {
        if self.from_days < self.to_days || self.to_days < 0 {
            tracing::warn!(
                from_days = self.from_days,
                to_days = self.to_days,
                "misconfigured report window, defaulting to 1 day ago"
            );
            (1, 1)
        } else {
            (self.from_days, self.to_days)
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct SmtpSettings {
    /// When false, reports are written to disk instead of being sent.
    #[serde(default)]
    pub enabled: bool,
    pub server: String,
    pub port: u16,
    pub mail_from: String,
    pub subject: String,
    #[serde(default)]
    pub signature: String,
}

/// One monitored customer: credentials reference plus service subscription.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TenantConfig {
    pub name: String,
    /// Environment variable holding `directoryId;clientId;secretValue`.
    pub credentials_var: String,
    /// Service ids to keep from the health overview; must be non-empty.
    pub services: Vec<String>,
    pub mail_to: String,
    #[serde(default)]
    pub mail_cc: String,
}

impl Settings {
    /// Look up a tenant by name, case-insensitive.
    pub fn tenant(&self, name: &str) -> Option<&TenantConfig> {
        self.customers
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    fn validate(self) -> Result<Self, config::ConfigError> {
        if self.customers.is_empty() {
            return Err(config::ConfigError::Message(
                "no customers configured".to_string(),
            ));
        }
        for tenant in &self.customers {
            if tenant.services.is_empty() {
                return Err(config::ConfigError::Message(format!(
                    "customer [{}] has no monitored services",
                    tenant.name
                )));
            }
        }
        Ok(self)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize our configuration reader
    let mut settings = config::Config::default();

    // Add configuration values from a file named `configuration`
    // with the .yaml extension
    settings.merge(config::File::with_name("configuration"))?; // .json, .toml, .yaml, .yml

    // Try to convert the configuration values it read into
    // our Settings type
    let config: Settings = settings.try_deserialize()?;

    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(from_days: i64, to_days: i64) -> ReportSettings {
        ReportSettings {
            from_days,
            to_days,
            band_ok_percent: default_band_ok(),
            band_warn_percent: default_band_warn(),
        }
    }

    #[test]
    fn ordered_window_is_kept() {
        assert_eq!(report(11, 1).window_days(), (11, 1));
        assert_eq!(report(1, 1).window_days(), (1, 1));
    }

    #[test]
    fn misordered_window_defaults_to_prior_day() {
        assert_eq!(report(1, 11).window_days(), (1, 1));
        assert_eq!(report(5, -1).window_days(), (1, 1));
    }

    #[test]
    fn tenant_lookup_is_case_insensitive() {
        let settings = Settings {
            database: DatabaseSettings {
                path: "db.sqlite".into(),
            },
            directories: DirectorySettings {
                images: "images".into(),
            },
            api: ApiSettings {
                auth_endpoint: "https://login.example.com".into(),
                health_endpoint: "https://api.example.com/health".into(),
                scope: "https://api.example.com/.default".into(),
                timeout_secs: 30,
            },
            retention_days: 30,
            report: report(11, 1),
            smtp: SmtpSettings {
                enabled: false,
                server: "127.0.0.1".into(),
                port: 25,
                mail_from: "noreply@example.com".into(),
                subject: "Service health report".into(),
                signature: String::new(),
            },
            customers: vec![TenantConfig {
                name: "Acme".into(),
                credentials_var: "HEALTHWATCH_ACME".into(),
                services: vec!["Intune".into()],
                mail_to: "ops@acme.example".into(),
                mail_cc: String::new(),
            }],
            severity: Vec::new(),
        };
        assert!(settings.tenant("acme").is_some());
        assert!(settings.tenant("ACME").is_some());
        assert!(settings.tenant("unknown").is_none());
    }
}
