#![allow(dead_code)]

use std::path::Path;

use healthwatch::configuration::{
    ApiSettings, DatabaseSettings, DirectorySettings, ReportSettings, Settings, SmtpSettings,
    TenantConfig,
};

/// Settings pointing at scratch paths and (optionally) a mock server.
pub fn test_settings(db_path: &Path, images: &Path, api_base: &str) -> Settings {
    Settings {
        database: DatabaseSettings {
            path: db_path.to_path_buf(),
        },
        directories: DirectorySettings {
            images: images.to_path_buf(),
        },
        api: ApiSettings {
            auth_endpoint: api_base.to_string(),
            health_endpoint: format!("{}/health", api_base),
            scope: "https://api.example.com/.default".to_string(),
            timeout_secs: 5,
        },
        retention_days: 30,
        report: ReportSettings {
            from_days: 11,
            to_days: 1,
            band_ok_percent: 97.0,
            band_warn_percent: 95.0,
        },
        smtp: SmtpSettings {
            enabled: false,
            server: "127.0.0.1".to_string(),
            port: 25,
            mail_from: "noreply@example.com".to_string(),
            subject: "Service health report".to_string(),
            signature: String::new(),
        },
        customers: Vec::new(),
        severity: Vec::new(),
    }
}

pub fn tenant(name: &str, credentials_var: &str, services: &[&str]) -> TenantConfig {
    TenantConfig {
        name: name.to_string(),
        credentials_var: credentials_var.to_string(),
        services: services.iter().map(|s| s.to_string()).collect(),
        mail_to: format!("ops@{}.example", name),
        mail_cc: String::new(),
    }
}
