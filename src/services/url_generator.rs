use log::{debug, warn};

use crate::config::ShortCodeConfig;
use crate::errors::AppError;
use crate::repositories::UrlRecordRepositoryTrait;
use crate::utils::id_generator;

const DEFAULT_CODE_LENGTH: usize = 6;
const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// A short code chosen for a new record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedCode {
    pub short_code: String,
    pub is_custom: bool,
}

/// Picks short codes: custom aliases verbatim, otherwise a hash of the long
/// URL with salted rehashes on collision.
#[derive(Debug, Clone)]
pub struct UrlGeneratorService {
    code_length: usize,
    max_attempts: usize,
}

impl Default for UrlGeneratorService {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH, DEFAULT_MAX_ATTEMPTS)
    }
}

impl UrlGeneratorService {
    pub fn new(code_length: usize, max_attempts: usize) -> Self {
        Self {
            code_length,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &ShortCodeConfig) -> Self {
        Self::new(config.length, config.max_attempts)
    }

    /// Resolve the code for a new record.
    ///
    /// ### Errors
    /// * `AppError::Conflict` - the custom alias is already taken
    /// * `AppError::CodeGeneration` - every generated candidate collided
    pub async fn assign(
        &self,
        repository: &dyn UrlRecordRepositoryTrait,
        long_url: &str,
        custom_alias: Option<&str>,
    ) -> Result<AssignedCode, AppError> {
        if let Some(alias) = custom_alias {
            if repository.exists(alias).await? {
                return Err(AppError::Conflict("Custom alias already in use".to_string()));
            }
            return Ok(AssignedCode {
                short_code: alias.to_string(),
                is_custom: true,
            });
        }

        let mut candidate = id_generator::initial_code(long_url, self.code_length);
        for attempt in 1..=self.max_attempts {
            if !repository.exists(&candidate).await? {
                debug!("Assigned code '{}' after {} attempt(s)", candidate, attempt);
                return Ok(AssignedCode {
                    short_code: candidate,
                    is_custom: false,
                });
            }
            candidate = id_generator::salted_code(long_url, self.code_length);
        }

        warn!(
            "Gave up generating a code for '{}' after {} collisions",
            long_url, self.max_attempts
        );
        Err(AppError::CodeGeneration(format!(
            "No free short code after {} attempts",
            self.max_attempts
        )))
    }
}
