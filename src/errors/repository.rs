use sqlx::Error as SqlxError;
use thiserror::Error;

/// Failures surfaced by a URL record store.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(SqlxError),

    /// Unique collision on insert: a taken short code, or a second
    /// generated code for the same long URL
    #[error("Conflict error: {0}")]
    Conflict(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::Database(db_err) => {
                // PostgreSQL error codes for common constraints
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        // Unique violation
                        "23505" => {
                            let constraint = db_err.constraint().unwrap_or("urls_pkey");
                            return Self::Conflict(format!("Unique constraint '{}' violated", constraint));
                        }
                        // Not-null / check violation
                        "23502" | "23514" => {
                            return Self::InvalidData("Record violates table constraints".to_string())
                        }
                        _ => {}
                    }
                }
                Self::Database(SqlxError::Database(db_err))
            }
            _ => Self::Database(err),
        }
    }
}
