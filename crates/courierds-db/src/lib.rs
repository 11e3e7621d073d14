//! # CourierDS DB
//!
//! PostgreSQL pool construction and the store round-trip budget.
//!
//! # Example
//!
//! ```ignore
//! use courierds_config::DatabaseConfig;
//! use courierds_db::{init_db_pool, with_timeout};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()).await?;
//! let count: i64 = with_timeout(
//!     sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(&pool),
//! )
//! .await?;
//! ```

use std::future::Future;
use std::io;
use std::time::Duration;

use courierds_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub use sqlx::PgPool;

/// Upper bound for a single store round trip.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the pool and pings the server once.
///
/// Fails when `DATABASE_URL` is missing or the first connection cannot be
/// acquired within the configured acquire timeout.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .idle_timeout(config.max_idle_time)
        .acquire_timeout(config.acquire_timeout)
        .connect(url)
        .await?;

    with_timeout(sqlx::query("SELECT 1").execute(&pool)).await?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool established"
    );

    Ok(pool)
}

/// Runs a store call under [`QUERY_TIMEOUT`]. An elapsed budget is reported
/// as an I/O timeout so callers treat it like any other store failure.
pub async fn with_timeout<F, T>(fut: F) -> Result<T, sqlx::Error>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    with_budget(QUERY_TIMEOUT, fut).await
}

pub async fn with_budget<F, T>(budget: Duration, fut: F) -> Result<T, sqlx::Error>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => Err(sqlx::Error::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            "store call exceeded its time budget",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let value = with_timeout(async { Ok::<_, sqlx::Error>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_with_budget_elapses() {
        let result = with_budget(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, sqlx::Error>(())
        })
        .await;

        match result {
            Err(sqlx::Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::TimedOut),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_url_is_configuration_error() {
        let config = DatabaseConfig::default();
        let result = init_db_pool(&config).await;
        assert!(matches!(result, Err(sqlx::Error::Configuration(_))));
    }
}
