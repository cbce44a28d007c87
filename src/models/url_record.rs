// src/models/url_record.rs - Pure data structures
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::validations::{validate_custom_alias, validate_expiry_days, validate_url};

/// Body of `POST /shorten`, accepted as JSON or as a form.
///
/// `url` is optional at the type level so a missing field reaches the
/// service and is reported as "No URL provided" instead of an extractor error.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUrlDto {
    #[validate(custom(function = "validate_url"))]
    pub url: Option<String>,

    #[validate(custom(function = "validate_custom_alias"))]
    pub alias: Option<String>,

    /// Checked by the service only once a new record is needed
    pub expires_in_days: Option<RawExpiry>,
}

/// `expires_in_days` as submitted. Forms always send text and JSON clients
/// sometimes do too, so numbers and numeric strings are both taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawExpiry {
    Days(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RawExpiry {
    /// Whole days until expiry; blank text means no expiry
    pub fn days(&self) -> Result<Option<u32>, ValidationError> {
        let days = match self {
            RawExpiry::Days(days) => *days,
            RawExpiry::Text(text) if text.trim().is_empty() => return Ok(None),
            RawExpiry::Text(text) => text.trim().parse::<i64>().map_err(|_| not_whole_days())?,
            RawExpiry::Other(serde_json::Value::Null) => return Ok(None),
            RawExpiry::Other(_) => return Err(not_whole_days()),
        };
        validate_expiry_days(days).map(Some)
    }
}

fn not_whole_days() -> ValidationError {
    let mut err = ValidationError::new("expiry_days_format");
    err.message = Some("Expiry days must be a whole number".into());
    err
}

impl CreateUrlDto {
    /// The requested alias, treating an empty or blank one as absent.
    pub fn requested_alias(&self) -> Option<&str> {
        self.alias.as_deref().filter(|alias| !alias.trim().is_empty())
    }
}

/// A stored mapping from short code to long URL
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The original, long URL that was shortened
    pub long_url: String,

    /// Primary key; generated or caller-supplied
    pub short_code: String,

    /// True when the short code was supplied by the caller
    #[sqlx(rename = "custom_alias")]
    pub is_custom: bool,

    /// Number of successful redirects
    pub access_count: i64,

    /// When this mapping stops redirecting (None means it never expires)
    pub expires_at: Option<DateTime<Utc>>,
}

impl UrlRecord {
    /// Checks whether the mapping has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expiry) if expiry < now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Everything needed to insert a fresh record; the counter always starts at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlRecord {
    pub long_url: String,
    pub short_code: String,
    pub is_custom: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<NewUrlRecord> for UrlRecord {
    fn from(record: NewUrlRecord) -> Self {
        UrlRecord {
            long_url: record.long_url,
            short_code: record.short_code,
            is_custom: record.is_custom,
            access_count: 0,
            expires_at: record.expires_at,
        }
    }
}

// Response body of `POST /shorten`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortenedUrlResponseDto {
    pub original_url: String,
    pub short_url: String,
    pub short_code: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortenedUrlResponseDto {
    pub fn from_record(record: UrlRecord, base_url: &str) -> Self {
        ShortenedUrlResponseDto {
            short_url: format!("{}/{}", base_url, record.short_code),
            original_url: record.long_url,
            short_code: record.short_code,
            expires_at: record.expires_at,
        }
    }
}

// Shape shared by `GET /stats/{code}` and each entry of `GET /mappings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlStatsDto {
    pub original_url: String,
    pub short_code: String,
    pub access_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<UrlRecord> for UrlStatsDto {
    fn from(record: UrlRecord) -> Self {
        UrlStatsDto {
            original_url: record.long_url,
            short_code: record.short_code,
            access_count: record.access_count,
            expires_at: record.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(expires_at: Option<DateTime<Utc>>) -> UrlRecord {
        UrlRecord {
            long_url: "https://example.com".to_string(),
            short_code: "abc123".to_string(),
            is_custom: false,
            access_count: 0,
            expires_at,
        }
    }

    #[test]
    fn test_expiration() {
        let now = Utc::now();
        assert!(!record(None).is_expired_at(now));
        assert!(!record(Some(now + Duration::days(1))).is_expired_at(now));
        assert!(record(Some(now - Duration::seconds(1))).is_expired_at(now));
    }

    #[test]
    fn test_response_builds_short_url() {
        let dto = ShortenedUrlResponseDto::from_record(record(None), "http://127.0.0.1:8000");
        assert_eq!(dto.short_url, "http://127.0.0.1:8000/abc123");
        assert_eq!(dto.original_url, "https://example.com");
    }

    #[test]
    fn test_null_expiry_serializes_as_null() {
        let json = serde_json::to_value(UrlStatsDto::from(record(None))).unwrap();
        assert!(json["expires_at"].is_null());
        assert_eq!(json["access_count"], 0);
    }

    #[test]
    fn test_blank_alias_is_ignored() {
        let dto = CreateUrlDto {
            url: Some("https://example.com".into()),
            alias: Some("  ".into()),
            expires_in_days: None,
        };
        assert_eq!(dto.requested_alias(), None);
    }

    fn parse(body: &str) -> CreateUrlDto {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_expiry_accepts_numbers_and_numeric_text() {
        let days = |body| parse(body).expires_in_days.unwrap().days().unwrap();
        assert_eq!(days(r#"{"expires_in_days": 7}"#), Some(7));
        assert_eq!(days(r#"{"expires_in_days": "7"}"#), Some(7));
        assert_eq!(days(r#"{"expires_in_days": " 30 "}"#), Some(30));
        assert_eq!(days(r#"{"expires_in_days": ""}"#), None);
        assert!(parse(r#"{"expires_in_days": null}"#).expires_in_days.is_none());
    }

    #[test]
    fn test_expiry_rejects_bad_values_after_parsing() {
        let err = |body| {
            parse(body)
                .expires_in_days
                .unwrap()
                .days()
                .unwrap_err()
                .message
                .unwrap()
                .to_string()
        };
        assert_eq!(err(r#"{"expires_in_days": "x"}"#), "Expiry days must be a whole number");
        assert_eq!(err(r#"{"expires_in_days": 1.5}"#), "Expiry days must be a whole number");
        assert_eq!(err(r#"{"expires_in_days": true}"#), "Expiry days must be a whole number");
        assert_eq!(err(r#"{"expires_in_days": 0}"#), "Expiry days must be between 1 and 3650");
        assert_eq!(err(r#"{"expires_in_days": "-3"}"#), "Expiry days must be between 1 and 3650");
    }
}
