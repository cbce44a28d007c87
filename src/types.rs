use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::db::{Database, DatabaseHealth};
use crate::errors::AppError;
use crate::services::RateLimiter;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub storage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_health: Option<DatabaseHealth>,
    pub rate_limited_clients: Option<usize>,
    pub uptime_seconds: u64,
}

// Shared, read-only state used by the health endpoint
pub struct AppState {
    pub start_time: Instant,
    pub version: String,
    /// Present only when records live in Postgres
    pub db: Option<Database>,
    pub limiter: Option<Arc<RateLimiter>>,
}
