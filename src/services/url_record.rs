// src/services/url_record.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::{debug, info};
use validator::Validate;

use super::url_generator::UrlGeneratorService;
use crate::errors::{AppError, RepositoryError};
use crate::models::{CreateUrlDto, NewUrlRecord, ShortenedUrlResponseDto, UrlRecord, UrlStatsDto};
use crate::repositories::UrlRecordRepositoryTrait;
use crate::validations::validate_url;

type Result<T> = std::result::Result<T, AppError>;

/// What `create` did with the submitted URL
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// A new record was stored
    Created(ShortenedUrlResponseDto),
    /// A generated mapping for the same URL already existed and is reused
    Existing(ShortenedUrlResponseDto),
}

#[async_trait]
pub trait UrlRecordServiceTrait {
    async fn create(&self, dto: CreateUrlDto) -> Result<CreateOutcome>;
    /// Counts a visit and returns the destination of a live mapping
    async fn resolve(&self, short_code: &str) -> Result<UrlRecord>;
    async fn stats(&self, short_code: &str) -> Result<UrlStatsDto>;
    async fn list(&self) -> Result<Vec<UrlStatsDto>>;
}

pub struct UrlRecordService {
    repository: Arc<dyn UrlRecordRepositoryTrait>,
    generator: UrlGeneratorService,
    base_url: String,
}

impl UrlRecordService {
    pub fn new(
        repository: Arc<dyn UrlRecordRepositoryTrait>,
        generator: UrlGeneratorService,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            generator,
            base_url: base_url.into(),
        }
    }

    fn not_found() -> AppError {
        AppError::NotFound("Short URL not found".to_string())
    }

    fn existing(&self, record: UrlRecord) -> CreateOutcome {
        CreateOutcome::Existing(ShortenedUrlResponseDto::from_record(record, &self.base_url))
    }

    async fn find_existing(&self, long_url: &str) -> Result<Option<UrlRecord>> {
        match self.repository.find_by_long_url(long_url).await? {
            Some(code) => Ok(self.repository.get(&code).await?),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UrlRecordServiceTrait for UrlRecordService {
    async fn create(&self, mut dto: CreateUrlDto) -> Result<CreateOutcome> {
        let long_url = match dto.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => return Err(AppError::Validation("No URL provided".to_string())),
        };

        if validate_url(&long_url).is_err() {
            return Err(AppError::Validation("Invalid URL format".to_string()));
        }

        dto.alias = dto.requested_alias().map(str::to_string);
        dto.url = Some(long_url.clone());
        dto.validate()?;

        let alias = dto.alias.as_deref();
        if alias.is_none() {
            if let Some(existing) = self.find_existing(&long_url).await? {
                debug!("Reusing code '{}' for {}", existing.short_code, long_url);
                return Ok(self.existing(existing));
            }
        }

        let expires_at = match &dto.expires_in_days {
            Some(raw) => raw.days()?,
            None => None,
        }
        .map(|days| Utc::now() + Duration::days(i64::from(days)));

        let assigned = self
            .generator
            .assign(self.repository.as_ref(), &long_url, alias)
            .await?;

        let inserted = self
            .repository
            .insert(NewUrlRecord {
                long_url: long_url.clone(),
                short_code: assigned.short_code,
                is_custom: assigned.is_custom,
                expires_at,
            })
            .await;

        let record = match inserted {
            Ok(record) => record,
            Err(RepositoryError::Conflict(_)) if assigned.is_custom => {
                return Err(AppError::Conflict("Custom alias already in use".to_string()));
            }
            Err(RepositoryError::Conflict(_)) => {
                // Either the code was taken meanwhile or a concurrent request
                // stored a generated mapping for the same URL first
                if let Some(existing) = self.find_existing(&long_url).await? {
                    debug!("Lost insert race for {}, reusing '{}'", long_url, existing.short_code);
                    return Ok(self.existing(existing));
                }
                return Err(AppError::Conflict("Short code already in use".to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            "Created short code '{}' for {} (custom: {})",
            record.short_code, record.long_url, record.is_custom
        );
        Ok(CreateOutcome::Created(ShortenedUrlResponseDto::from_record(
            record,
            &self.base_url,
        )))
    }

    async fn resolve(&self, short_code: &str) -> Result<UrlRecord> {
        let mut record = self
            .repository
            .get(short_code)
            .await?
            .ok_or_else(Self::not_found)?;

        if record.is_expired() {
            info!("URL with code '{}' has expired", short_code);
            return Err(AppError::Expired("This link has expired".to_string()));
        }

        if !self.repository.increment_access(short_code).await? {
            return Err(Self::not_found());
        }
        record.access_count += 1;

        Ok(record)
    }

    async fn stats(&self, short_code: &str) -> Result<UrlStatsDto> {
        self.repository
            .get(short_code)
            .await?
            .map(UrlStatsDto::from)
            .ok_or_else(Self::not_found)
    }

    async fn list(&self) -> Result<Vec<UrlStatsDto>> {
        let records = self.repository.list_all().await?;
        Ok(records.into_iter().map(UrlStatsDto::from).collect())
    }
}
