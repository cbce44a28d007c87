use url::Url;
use validator::ValidationError;

/// Path segments owned by other routes; an alias with one of these names
/// could never be redirected to.
pub const RESERVED_ALIASES: &[&str] = &["shorten", "stats", "mappings", "health"];

const MAX_ALIAS_LEN: usize = 10;
const MAX_EXPIRY_DAYS: u32 = 3650;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates that a URL string is absolute and names a host.
/// Any scheme is accepted (`ftp://`, `sftp://`, ...).
pub fn validate_url(url_str: &str) -> Result<(), ValidationError> {
    let url = Url::parse(url_str.trim()).map_err(|_| error("url_format", "Invalid URL format"))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(error("url_format", "Invalid URL format")),
    }
}

/// Validates a caller-chosen alias:
/// - between 1 and 10 characters
/// - only ASCII alphanumerics, hyphens and underscores
/// - not the name of another route
pub fn validate_custom_alias(alias: &str) -> Result<(), ValidationError> {
    if alias.is_empty() || alias.len() > MAX_ALIAS_LEN {
        return Err(error(
            "custom_alias_length",
            "Custom alias must be between 1 and 10 characters",
        ));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(error(
            "custom_alias_charset",
            "Custom alias can only contain alphanumeric characters, hyphens, and underscores",
        ));
    }

    if RESERVED_ALIASES.contains(&alias.to_ascii_lowercase().as_str()) {
        return Err(error("custom_alias_reserved", "Custom alias is reserved"));
    }

    Ok(())
}

/// Checks an expiry given in days
pub fn validate_expiry_days(days: i64) -> Result<u32, ValidationError> {
    u32::try_from(days)
        .ok()
        .filter(|days| (1..=MAX_EXPIRY_DAYS).contains(days))
        .ok_or_else(|| error("expiry_days_range", "Expiry days must be between 1 and 3650"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://example.com/path?query=value").is_ok());
        assert!(validate_url("http://127.0.0.1:5000/a").is_ok());

        assert!(validate_url("not-a-url").is_err());
        assert!(validate_url("example.com").is_err());
        assert!(validate_url("mailto:someone@example.com").is_err());
        assert!(validate_url("file:///etc/hosts").is_err());
    }

    #[test]
    fn test_validate_url_accepts_other_schemes() {
        assert!(validate_url("ftp://example.com/file").is_ok());
        assert!(validate_url("sftp://files.example.com:22/pub").is_ok());
        assert!(validate_url("ftps://example.com").is_ok());
    }

    #[test]
    fn test_invalid_url_message() {
        let err = validate_url("nope").unwrap_err();
        assert_eq!(err.message.unwrap(), "Invalid URL format");
    }

    #[test]
    fn test_validate_custom_alias() {
        assert!(validate_custom_alias("my-link").is_ok());
        assert!(validate_custom_alias("promo_2024").is_ok());

        assert!(validate_custom_alias("").is_err());
        assert!(validate_custom_alias(&"a".repeat(11)).is_err());
        assert!(validate_custom_alias("invalid/alias").is_err());
        assert!(validate_custom_alias("caf\u{e9}").is_err());
    }

    #[test]
    fn test_validate_expiry_days() {
        assert_eq!(validate_expiry_days(1).unwrap(), 1);
        assert_eq!(validate_expiry_days(3650).unwrap(), 3650);
        assert!(validate_expiry_days(0).is_err());
        assert!(validate_expiry_days(-1).is_err());
        assert!(validate_expiry_days(3651).is_err());
    }

    #[test]
    fn test_reserved_aliases_are_rejected() {
        for alias in RESERVED_ALIASES {
            assert!(validate_custom_alias(alias).is_err(), "{} should be reserved", alias);
        }
        assert!(validate_custom_alias("Stats").is_err());
    }
}
