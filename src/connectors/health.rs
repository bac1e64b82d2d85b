//! Health-overview endpoint client.

use chrono::NaiveDateTime;

use crate::connectors::errors::ConnectorError;
use crate::models::StatusRecord;

/// One service entry from the health-overview response. Only these three
/// fields are consumed; anything else in the payload is ignored.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct HealthOverviewItem {
    pub id: String,
    pub service: String,
    #[serde(default)]
    pub status: String,
}

/// The health endpoint wraps its items in `{ "value": [...] }`.
#[derive(Debug, serde::Deserialize)]
struct HealthOverviewEnvelope {
    #[serde(default)]
    value: Vec<HealthOverviewItem>,
}

/// Fetch current health for one tenant, filtered to its monitored services.
///
/// One GET, one attempt. Every returned record carries the same `polled_at`
/// timestamp: a poll cycle is a single observation instant for the tenant.
pub async fn fetch_health_overview(
    http: &reqwest::Client,
    endpoint: &str,
    token: &str,
    tenant: &str,
    monitored: &[String],
    polled_at: NaiveDateTime,
) -> Result<Vec<StatusRecord>, ConnectorError> {
    let response = http
        .get(endpoint)
        .bearer_auth(token)
        .header("Content-Type", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ConnectorError::UnexpectedStatus { status, body });
    }

    let envelope: HealthOverviewEnvelope = response
        .json()
        .await
        .map_err(|e| ConnectorError::InvalidResponse(e.to_string()))?;

    let records = envelope
        .value
        .into_iter()
        .filter(|item| monitored.iter().any(|id| id == &item.id))
        .map(|item| {
            tracing::info!(service = %item.service, status = %item.status, "service status");
            StatusRecord::new(tenant, polled_at, item.service, item.status)
        })
        .collect();

    Ok(records)
}
