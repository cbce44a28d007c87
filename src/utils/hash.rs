use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `input`, truncated to `length` characters.
///
/// `length` is capped at the full digest width (64).
pub fn truncated_hex_digest(input: &str, length: usize) -> String {
    let mut hex = format!("{:x}", Sha256::digest(input.as_bytes()));
    hex.truncate(length);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic_and_truncated() {
        let a = truncated_hex_digest("https://example.com", 6);
        let b = truncated_hex_digest("https://example.com", 6);
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_known_prefix() {
        // sha256("abc") = ba7816bf...
        assert_eq!(truncated_hex_digest("abc", 8), "ba7816bf");
    }

    #[test]
    fn test_length_is_capped() {
        assert_eq!(truncated_hex_digest("abc", 500).len(), 64);
    }
}
