//! External service connectors.
//!
//! Adapters for the two remote collaborators of a scan cycle: the identity
//! provider (client-credential token exchange) and the vendor's
//! health-overview endpoint. All remote access goes through here so the
//! scan and report pipelines stay independent and testable against HTTP
//! stubs.

pub mod auth;
pub mod errors;
pub mod health;

pub use auth::{authenticate, ApiCredentials, TokenResponse};
pub use errors::ConnectorError;
pub use health::{fetch_health_overview, HealthOverviewItem};

/// Shared HTTP client with the configured bounded timeout.
///
/// One client per run; both the token exchange and the health fetch use it,
/// so an unresponsive remote can never hang a poll cycle indefinitely.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ConnectorError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ConnectorError::Request(format!("cannot build HTTP client: {}", e)))
}
