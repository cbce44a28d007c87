use rand::{rng, Rng};

use super::hash::truncated_hex_digest;

/// First candidate for a long URL: the same URL always yields the same code.
pub fn initial_code(long_url: &str, length: usize) -> String {
    truncated_hex_digest(long_url, length)
}

/// Retry candidate after a collision: the URL salted with a fresh random value.
pub fn salted_code(long_url: &str, length: usize) -> String {
    let salt: u64 = rng().random();
    truncated_hex_digest(&format!("{}{}", long_url, salt), length)
}
