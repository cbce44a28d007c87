use std::time::{Duration, Instant};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use sqlx::{
    migrate::MigrateError,
    postgres::{PgPool, PgPoolOptions},
};
use thiserror::Error;

use crate::config::DatabaseConfig;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] MigrateError),
}

pub type DbResult<T> = Result<T, DatabaseError>;

/// Postgres pool backing the `urls` table
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

/// Result of a round trip to the database, reported by `/health`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Database {
    /// Opens the pool and, unless disabled, brings the schema up to date.
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        info!(
            "Connecting to Postgres (pool {}..{} connections)",
            config.min_connections, config.max_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect(&config.url)
            .await
            .inspect_err(|e| warn!("Failed to connect to database: {}", e))?;

        if config.use_migrations {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .inspect_err(|e| warn!("Migrations failed: {}", e))?;
            info!("Schema is up to date");
        }

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ping(&self) -> DatabaseHealth {
        let start = Instant::now();
        let result = sqlx::query("SELECT 1").execute(&self.pool).await;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        DatabaseHealth {
            reachable: result.is_ok(),
            latency_ms,
            error: result.err().map(|e| e.to_string()),
        }
    }

    /// Waits for checked-out connections to come back, then closes the pool
    pub async fn close(&self) {
        info!("Closing database pool ({} connections)", self.pool.size());
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: 1,
            min_connections: 0,
            use_migrations: false,
            connect_timeout_seconds: 1,
        }
    }

    #[tokio::test]
    async fn test_malformed_url_is_a_connection_error() {
        let result = Database::connect(&config("not a database url")).await;
        assert!(matches!(result, Err(DatabaseError::Connection(_))));
    }

    #[test]
    fn test_healthy_report_omits_error() {
        let health = DatabaseHealth {
            reachable: true,
            latency_ms: 3,
            error: None,
        };
        let value = serde_json::to_value(&health).unwrap();
        assert_eq!(value, serde_json::json!({ "reachable": true, "latency_ms": 3 }));
    }
}
