// Postgres pool construction and connectivity checks

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Build the connection pool for the given database URL
///
/// The pool is the only shared mutable resource in the application;
/// connections are acquired per query and released deterministically.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;

    tracing::info!("Database pool ready ({} connections max)", MAX_CONNECTIONS);
    Ok(pool)
}

/// Ping the database to verify connectivity
///
/// Callers bound this with a timeout so a stalled database cannot hang
/// health or readiness checks.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
