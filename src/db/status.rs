use chrono::NaiveDateTime;
use sqlx::sqlite::SqlitePool;
use tracing::Instrument;

use super::PersistenceError;
use crate::models::{parse_timestamp, StatusRecord, TIMESTAMP_FORMAT};

/// Append one poll cycle's records for a single tenant.
///
/// Wrapped in one transaction so a failed batch leaves no partial rows;
/// scan calls this once per tenant, keeping one tenant's failure from
/// corrupting another's batch.
pub async fn insert_batch(
    pool: &SqlitePool,
    records: &[StatusRecord],
) -> Result<(), PersistenceError> {
    let query_span = tracing::info_span!("Inserting status batch", rows = records.len());
    async {
        let mut tx = pool.begin().await.map_err(PersistenceError::Query)?;

        for record in records {
            sqlx::query(
                "INSERT INTO service_status (customer, timestamp, service, status) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&record.tenant)
            .bind(record.timestamp_string())
            .bind(&record.service)
            .bind(&record.status)
            .execute(&mut *tx)
            .await
            .map_err(PersistenceError::Query)?;
        }

        tx.commit().await.map_err(PersistenceError::Query)?;
        tracing::info!("{} status records saved", records.len());
        Ok(())
    }
    .instrument(query_span)
    .await
}

/// Select all records with `start <= timestamp <= end`, optionally filtered
/// to one customer, ordered for per-service grouping.
pub async fn fetch_window(
    pool: &SqlitePool,
    start: NaiveDateTime,
    end: NaiveDateTime,
    customer: Option<&str>,
) -> Result<Vec<StatusRecord>, PersistenceError> {
    let query_span = tracing::info_span!("Fetching report window");
    let start = start.format(TIMESTAMP_FORMAT).to_string();
    let end = end.format(TIMESTAMP_FORMAT).to_string();

    let rows: Vec<(String, String, String, String)> = async {
        match customer {
            Some(name) => {
                sqlx::query_as::<_, (String, String, String, String)>(
                    "SELECT customer, timestamp, service, status FROM service_status \
                     WHERE timestamp BETWEEN ?1 AND ?2 AND customer = ?3 \
                     ORDER BY customer, service, timestamp",
                )
                .bind(&start)
                .bind(&end)
                .bind(name)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, (String, String, String, String)>(
                    "SELECT customer, timestamp, service, status FROM service_status \
                     WHERE timestamp BETWEEN ?1 AND ?2 \
                     ORDER BY customer, service, timestamp",
                )
                .bind(&start)
                .bind(&end)
                .fetch_all(pool)
                .await
            }
        }
    }
    .instrument(query_span)
    .await
    .map_err(PersistenceError::Query)?;

    rows.into_iter()
        .map(|(tenant, timestamp, service, status)| {
            let timestamp = parse_timestamp(&timestamp)
                .map_err(|e| PersistenceError::MalformedRow(format!("{timestamp}: {e}")))?;
            Ok(StatusRecord {
                tenant,
                timestamp,
                service,
                status,
            })
        })
        .collect()
}

/// Delete records strictly older than `now - retention_days`.
///
/// Returns the number of rows removed. Runs once per poll cycle, after
/// storage succeeded.
pub async fn prune_older_than(
    pool: &SqlitePool,
    retention_days: i64,
) -> Result<u64, PersistenceError> {
    let cutoff = crate::models::now_utc() - chrono::Duration::days(retention_days);
    let cutoff = cutoff.format(TIMESTAMP_FORMAT).to_string();

    let query_span = tracing::info_span!("Pruning outdated records", %cutoff);
    let result = sqlx::query("DELETE FROM service_status WHERE timestamp < ?1")
        .bind(&cutoff)
        .execute(pool)
        .instrument(query_span)
        .await
        .map_err(PersistenceError::Query)?;

    Ok(result.rows_affected())
}
