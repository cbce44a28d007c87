// src/repositories/url_record.rs - Data access
use async_trait::async_trait;
use log::{debug, error};
use sqlx::PgPool;

use crate::db::Database;
use crate::errors::RepositoryError;
use crate::models::{NewUrlRecord, UrlRecord};

type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRecordRepositoryTrait: Send + Sync {
    /// Finds the short code of a generated (non-custom) mapping for exactly `long_url`
    ///
    /// ### Errors
    /// * `RepositoryError::Database` - If a database error occurs
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<String>>;

    /// Whether any record already uses `short_code`
    async fn exists(&self, short_code: &str) -> Result<bool>;

    /// Inserts a new record with a zero access count
    ///
    /// ### Errors
    /// * `RepositoryError::Conflict` - If `short_code` is already taken, or a
    ///   generated record for the same long URL exists
    /// * `RepositoryError::Database` - If a database error occurs
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord>;

    /// Fetches a record by short code, expired or not
    async fn get(&self, short_code: &str) -> Result<Option<UrlRecord>>;

    /// Atomically adds one to the access counter
    ///
    /// ### Returns
    /// * `Result<bool>` - `false` when no record has that short code
    async fn increment_access(&self, short_code: &str) -> Result<bool>;

    /// Every stored record, in no particular order
    async fn list_all(&self) -> Result<Vec<UrlRecord>>;
}

// Implementation using actual database
pub struct UrlRecordRepository {
    pool: PgPool,
}

impl UrlRecordRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl UrlRecordRepositoryTrait for UrlRecordRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<String>> {
        let code = sqlx::query_scalar::<_, String>(
            r#"
            SELECT short_code
            FROM urls
            WHERE long_url = $1 AND custom_alias = FALSE
            LIMIT 1
            "#,
        )
        .bind(long_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(code)
    }

    async fn exists(&self, short_code: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM urls WHERE short_code = $1)",
        )
        .bind(short_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord> {
        let inserted = sqlx::query_as::<_, UrlRecord>(
            r#"
            INSERT INTO urls (long_url, short_code, custom_alias, access_count, expires_at)
            VALUES ($1, $2, $3, 0, $4)
            RETURNING long_url, short_code, custom_alias, access_count, expires_at
            "#,
        )
        .bind(&record.long_url)
        .bind(&record.short_code)
        .bind(record.is_custom)
        .bind(record.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let err = RepositoryError::from(e);
            if !matches!(err, RepositoryError::Conflict(_)) {
                error!("Failed to insert URL record '{}': {}", record.short_code, err);
            }
            err
        })?;

        debug!("Inserted URL record '{}'", inserted.short_code);
        Ok(inserted)
    }

    async fn get(&self, short_code: &str) -> Result<Option<UrlRecord>> {
        let record = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT long_url, short_code, custom_alias, access_count, expires_at
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn increment_access(&self, short_code: &str) -> Result<bool> {
        // One statement, atomic under concurrent redirects
        let result = sqlx::query(
            "UPDATE urls SET access_count = access_count + 1 WHERE short_code = $1",
        )
        .bind(short_code)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>> {
        let records = sqlx::query_as::<_, UrlRecord>(
            "SELECT long_url, short_code, custom_alias, access_count, expires_at FROM urls",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
