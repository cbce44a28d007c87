use env_logger::Env;

use crate::{
    config::{Config, Environment},
    errors::AppError,
};

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(config: &Config) -> String {
    match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn,sqlx=warn".to_string(),
    }
}

/// Access-log line format for `actix_web::middleware::Logger`
pub fn access_log_format(environment: &Environment) -> &'static str {
    match environment {
        Environment::Production => "%a \"%r\" %s %b %T",
        _ => "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{X-Request-ID}o",
    }
}

// Setup logging with custom format and configuration
pub fn setup_logging(config: &Config) -> Result<(), AppError> {
    let env = Env::default()
        .filter_or("RUST_LOG", default_filter(config))
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_log_format_is_compact() {
        assert!(!access_log_format(&Environment::Production).contains("User-Agent"));
        assert!(access_log_format(&Environment::Development).contains("X-Request-ID"));
    }
}
