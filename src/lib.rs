pub mod analysis;
pub mod chart;
pub mod configuration;
pub mod connectors;
pub mod db;
pub mod mailer;
pub mod models;
pub mod report;
pub mod scan;
pub mod severity;
pub mod telemetry;
