//! Postgres access for the metadata store

pub mod variables;

pub use variables::PostgresVariableSource;

use crate::config::DatabaseConfig;
use crate::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Build a connection pool. Connections are opened lazily, so an unreachable
/// server only surfaces on first use.
pub fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .min_connections(config.pool_min_size)
        .max_connections(config.pool_max_size)
        .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
        .connect_lazy(&config.url)
        .map_err(crate::Error::Database)?;

    tracing::info!(
        max_connections = config.pool_max_size,
        "Database pool created"
    );
    Ok(pool)
}
