use std::env::VarError;

use thiserror::Error;

/// Failures while assembling [`crate::config::Config`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] VarError),

    /// A variable (or its default) did not parse into the target type.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A variable parsed but is outside the accepted range.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}
