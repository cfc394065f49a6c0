//! Deterministic shuffling
//!
//! Each shuffle seeds a ChaCha8 generator with the SHA-256 digest of the value
//! being shuffled, so the same input always yields the same permutation.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

fn seeded_rng(seed_source: &str) -> ChaCha8Rng {
    let digest = Sha256::digest(seed_source.as_bytes());
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    ChaCha8Rng::from_seed(seed)
}

fn shuffle_chars(value: &str, rng: &mut ChaCha8Rng) -> String {
    let mut chars: Vec<char> = value.chars().collect();
    chars.shuffle(rng);
    chars.into_iter().collect()
}

/// Permute the local part of an email, seeded by the whole address
pub fn shuffle_email(email: &str) -> String {
    let mut rng = seeded_rng(email);
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", shuffle_chars(local, &mut rng), domain),
        None => shuffle_chars(email, &mut rng),
    }
}

/// Permute the digits of a phone number
///
/// Formatting characters are dropped; a leading `+` is kept.
pub fn shuffle_phone(phone: &str) -> String {
    let mut rng = seeded_rng(phone);
    let mut digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.shuffle(&mut rng);

    let prefix = if phone.trim_start().starts_with('+') {
        "+"
    } else {
        ""
    };
    format!("{prefix}{}", digits.into_iter().collect::<String>())
}

/// Permute the characters inside each whitespace-delimited token
///
/// Every token gets its own seed, so equal tokens shuffle identically
/// wherever they appear.
pub fn shuffle_address(address: &str) -> String {
    address
        .split_whitespace()
        .map(|token| shuffle_chars(token, &mut seeded_rng(token)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(value: &str) -> Vec<char> {
        let mut chars: Vec<char> = value.chars().collect();
        chars.sort_unstable();
        chars
    }

    #[test]
    fn test_shuffle_phone_is_deterministic() {
        let first = shuffle_phone("1234567890");
        let second = shuffle_phone("1234567890");
        assert_eq!(first, second);
        assert_ne!(first, "1234567890");
        assert_eq!(sorted(&first), sorted("1234567890"));
    }

    #[test]
    fn test_shuffle_phone_keeps_plus_and_drops_formatting() {
        let shuffled = shuffle_phone("+44 (0) 20 7946 0958");
        assert!(shuffled.starts_with('+'));
        assert_eq!(sorted(&shuffled[1..]), sorted("4402079460958"));
    }

    #[test]
    fn test_shuffle_email_keeps_domain() {
        let shuffled = shuffle_email("john.doe@example.com");
        assert_eq!(shuffled, shuffle_email("john.doe@example.com"));
        let (local, domain) = shuffled.rsplit_once('@').unwrap();
        assert_eq!(domain, "example.com");
        assert_eq!(sorted(local), sorted("john.doe"));
    }

    #[test]
    fn test_shuffle_address_per_token() {
        let shuffled = shuffle_address("123 Main St");
        assert_eq!(shuffled, shuffle_address("123 Main St"));

        let tokens: Vec<&str> = shuffled.split(' ').collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(sorted(tokens[0]), sorted("123"));
        assert_eq!(sorted(tokens[1]), sorted("Main"));
        assert_eq!(sorted(tokens[2]), sorted("St"));

        // same token, same permutation
        let other = shuffle_address("9 Main Ave");
        assert_eq!(other.split(' ').nth(1), Some(tokens[1]));
    }
}
