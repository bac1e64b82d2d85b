//! Poll-cycle orchestration (`scan` mode).
//!
//! For every configured tenant: resolve credentials, authenticate, fetch
//! the health overview, store the batch. A tenant's failure at any step is
//! logged and never blocks the remaining tenants. Retention pruning runs
//! once at the end of a cycle that stored at least one batch.

use sqlx::sqlite::SqlitePool;

use crate::configuration::{Settings, TenantConfig};
use crate::connectors::{self, ApiCredentials, ConnectorError};
use crate::db;
use crate::models::StatusRecord;

/// Run one scan cycle. Only the HTTP client build is fatal; everything
/// else degrades to per-tenant log entries.
pub async fn run_scan(settings: &Settings, pool: &SqlitePool) -> Result<(), ConnectorError> {
    let http = connectors::http_client(settings.api.timeout_secs)?;

    tracing::info!("checking configured customers");
    let mut stored_batches = 0usize;

    for tenant in &settings.customers {
        tracing::info!(tenant = %tenant.name, "polling tenant");

        let records = match poll_tenant(&http, settings, tenant).await {
            Ok(records) => records,
            Err(err) if err.is_configuration() => {
                tracing::warn!(tenant = %tenant.name, "skipping tenant: {}", err);
                continue;
            }
            Err(err) => {
                tracing::warn!(tenant = %tenant.name, "skipping tenant this cycle: {}", err);
                continue;
            }
        };

        if records.is_empty() {
            tracing::warn!(
                tenant = %tenant.name,
                "health overview contained none of the monitored services"
            );
            continue;
        }

        match db::insert_batch(pool, &records).await {
            Ok(()) => stored_batches += 1,
            Err(err) => {
                tracing::error!(tenant = %tenant.name, "cannot store batch: {}", err);
            }
        }
    }

    if stored_batches > 0 {
        match db::prune_older_than(pool, settings.retention_days).await {
            Ok(deleted) => tracing::info!(
                "{} records older than {} days removed from datastore",
                deleted,
                settings.retention_days
            ),
            Err(err) => tracing::error!("cannot delete outdated records: {}", err),
        }
    } else {
        tracing::warn!("no health data to save");
    }

    Ok(())
}

/// One tenant's poll: credentials → token → filtered health overview.
///
/// All records of the returned batch share a single poll timestamp.
async fn poll_tenant(
    http: &reqwest::Client,
    settings: &Settings,
    tenant: &TenantConfig,
) -> Result<Vec<StatusRecord>, ConnectorError> {
    let credentials = ApiCredentials::from_env(&tenant.credentials_var)?;

    let token = connectors::authenticate(
        http,
        &settings.api.auth_endpoint,
        &settings.api.scope,
        &credentials,
    )
    .await?;
    tracing::info!(tenant = %tenant.name, "token obtained");

    let polled_at = crate::models::now_utc();
    connectors::fetch_health_overview(
        http,
        &settings.api.health_endpoint,
        &token,
        &tenant.name,
        &tenant.services,
        polled_at,
    )
    .await
}
