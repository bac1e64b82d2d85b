//! Local SQLite datastore.
//!
//! One table, `service_status`, holding every status snapshot. Timestamps
//! are stored as `YYYY-MM-DD HH:MM:SS` TEXT so lexicographic comparison in
//! range queries equals temporal comparison. The pool is capped at a single
//! connection, which serializes store and prune within a run.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

mod status;

pub use status::{fetch_window, insert_batch, prune_older_than};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("datastore unavailable: {0}")]
    Connect(sqlx::Error),
    #[error("query failed: {0}")]
    Query(sqlx::Error),
    #[error("malformed row in datastore: {0}")]
    MalformedRow(String),
}

/// Open (creating if missing) the datastore at `path` and ensure the schema.
pub async fn connect(path: &Path) -> Result<SqlitePool, PersistenceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PersistenceError::Connect(sqlx::Error::Io(e)))?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(PersistenceError::Connect)?;

    init(&pool).await?;

    Ok(pool)
}

/// Create the status table when absent.
async fn init(pool: &SqlitePool) -> Result<(), PersistenceError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS service_status (
            customer TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            service TEXT NOT NULL,
            status TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(PersistenceError::Query)?;

    Ok(())
}
