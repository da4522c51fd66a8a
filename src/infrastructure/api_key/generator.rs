//! API key generation
//!
//! Produces cryptographically secure bearer secrets together with their
//! storage digest and display prefix.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Literal prefix carried by every issued key
pub const KEY_PREFIX: &str = "dpx";

/// Number of random bytes in the secret portion
const KEY_BYTES: usize = 32;

/// Characters of the plaintext retained for display
const DISPLAY_PREFIX_LEN: usize = 12;

/// Total plaintext length: prefix + underscore + 64 hex chars
pub const KEY_LENGTH: usize = KEY_PREFIX.len() + 1 + KEY_BYTES * 2;

/// Result of generating a new API key
///
/// `key` is the only place the plaintext ever exists; callers return it to
/// the owner once and drop it.
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full plaintext secret (only shown once at creation)
    pub key: String,
    /// First 12 characters, for identification in listings
    pub prefix: String,
    /// SHA-256 hex digest, the only form that is persisted
    pub digest: String,
}

/// Generator for secure API keys; pure, stateless
#[derive(Debug, Clone, Default)]
pub struct ApiKeyGenerator;

impl ApiKeyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new API key: `dpx_<64 lowercase hex chars>`
    pub fn generate(&self) -> GeneratedApiKey {
        let mut random_bytes = [0u8; KEY_BYTES];
        OsRng.fill_bytes(&mut random_bytes);

        let key = format!("{}_{}", KEY_PREFIX, hex::encode(random_bytes));

        GeneratedApiKey {
            prefix: display_prefix(&key).to_string(),
            digest: digest_key(&key),
            key,
        }
    }
}

/// SHA-256 hex digest of a full plaintext key
pub fn digest_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// First 12 characters of a key, shown for identification only
///
/// Safe on arbitrary input, including tokens shorter than the prefix.
pub fn display_prefix(key: &str) -> &str {
    let end = key
        .char_indices()
        .nth(DISPLAY_PREFIX_LEN)
        .map(|(i, _)| i)
        .unwrap_or(key.len());
    &key[..end]
}

/// Check that a bearer token has the issued format:
/// literal prefix, underscore, 64 lowercase hex characters
pub fn is_well_formed(token: &str) -> bool {
    let Some(rest) = token
        .strip_prefix(KEY_PREFIX)
        .and_then(|r| r.strip_prefix('_'))
    else {
        return false;
    };

    rest.len() == KEY_BYTES * 2
        && rest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key_format() {
        let generated = ApiKeyGenerator::new().generate();

        assert!(generated.key.starts_with("dpx_"));
        assert_eq!(generated.key.len(), KEY_LENGTH);
        assert_eq!(generated.key.len(), 68);
        assert!(is_well_formed(&generated.key));
    }

    #[test]
    fn test_display_prefix_length() {
        let generated = ApiKeyGenerator::new().generate();

        assert_eq!(generated.prefix.len(), 12);
        assert!(generated.key.starts_with(&generated.prefix));
    }

    #[test]
    fn test_display_prefix_on_arbitrary_input() {
        assert_eq!(display_prefix("dpx_ab"), "dpx_ab");
        assert_eq!(display_prefix(""), "");
        // Never splits a character in the middle
        assert_eq!(
            display_prefix("ここは多バイト文字のトークンです"),
            "ここは多バイト文字のトー"
        );
    }

    #[test]
    fn test_key_uniqueness() {
        let generator = ApiKeyGenerator::new();
        let key1 = generator.generate();
        let key2 = generator.generate();

        assert_ne!(key1.key, key2.key);
        assert_ne!(key1.digest, key2.digest);
    }

    #[test]
    fn test_digest_deterministic() {
        let key = "dpx_0000000000000000000000000000000000000000000000000000000000000000";

        assert_eq!(digest_key(key), digest_key(key));
        assert_eq!(digest_key(key).len(), 64);
    }

    #[test]
    fn test_digest_matches_generated() {
        let generated = ApiKeyGenerator::new().generate();

        assert_eq!(digest_key(&generated.key), generated.digest);
    }

    #[test]
    fn test_is_well_formed() {
        let generated = ApiKeyGenerator::new().generate();
        assert!(is_well_formed(&generated.key));

        // Wrong prefix
        assert!(!is_well_formed(
            "sk_0000000000000000000000000000000000000000000000000000000000000000"
        ));
        // Missing separator
        assert!(!is_well_formed(
            "dpx0000000000000000000000000000000000000000000000000000000000000000"
        ));
        // Too short
        assert!(!is_well_formed("dpx_00ff"));
        // Uppercase hex is rejected
        assert!(!is_well_formed(
            "dpx_00000000000000000000000000000000000000000000000000000000000000FF"
        ));
        assert!(!is_well_formed(""));
    }
}
