//! One-way hashing for password-equivalent values

use sha2::{Digest, Sha256};

/// Length of the truncated hex digest
pub const HASH_LENGTH: usize = 10;

/// SHA-256 of the value, hex encoded and truncated to [`HASH_LENGTH`] characters
pub fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut hex = format!("{digest:x}");
    hex.truncate(HASH_LENGTH);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_short() {
        let first = hash_value("password123");
        assert_eq!(first, hash_value("password123"));
        assert_eq!(first.len(), HASH_LENGTH);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(first, "password123");
    }

    #[test]
    fn test_known_digest_prefix() {
        // sha256("password123") = ef92b778bafe771e89245b89ecbc08a4...
        assert_eq!(hash_value("password123"), "ef92b778ba");
    }

    #[test]
    fn test_different_inputs_differ() {
        assert_ne!(hash_value("password123"), hash_value("password456"));
    }
}
