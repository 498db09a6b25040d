//! Connection pool with explicit open/close lifecycle.
//!
//! Wraps a `PgPool` so the backend owns exactly one shared connection
//! resource: opened on construction, released on [`DatabasePool::close`]
//! (or when the last clone drops). Opening also ensures the pgvector
//! extension is installed.

use semstore_types::config::DatabaseSettings;
use semstore_types::error::SemanticStoreError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Shared PostgreSQL connection pool for a store service instance.
#[derive(Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Connect to PostgreSQL and ensure the `vector` extension exists.
    pub async fn new(settings: &DatabaseSettings) -> Result<Self, SemanticStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.url)
            .await
            .map_err(|e| SemanticStoreError::Storage(format!("connect failed: {e}")))?;

        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&pool)
            .await
            .map_err(|e| {
                SemanticStoreError::Storage(format!("pgvector extension unavailable: {e}"))
            })?;

        tracing::info!(
            max_connections = settings.max_connections,
            "database pool opened"
        );
        Ok(Self { pool })
    }

    /// The underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close all connections. Safe to call more than once.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }
}
