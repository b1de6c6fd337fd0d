//! Credential hashing using a keyed SHA-256 digest

use sha2::{Digest, Sha256};
use std::fmt::Debug;

/// Trait for credential hashing operations
pub trait CredentialHasher: Send + Sync + Debug {
    /// Hash a plaintext secret into its stored representation
    fn hash(&self, secret: &str) -> String;

    /// Check a plaintext secret against a stored digest
    fn verify(&self, secret: &str, digest: &str) -> bool {
        constant_time_compare(&self.hash(secret), digest)
    }
}

/// SHA-256 over the secret followed by a process-wide key, hex encoded
///
/// Unsalted: two users with the same secret share a digest. Existing digests
/// stay valid only as long as the key is unchanged.
#[derive(Clone)]
pub struct KeyedSha256Hasher {
    key: String,
}

impl KeyedSha256Hasher {
    /// Create a hasher bound to `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Debug for KeyedSha256Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedSha256Hasher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl CredentialHasher for KeyedSha256Hasher {
    fn hash(&self, secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.update(self.key.as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let hasher = KeyedSha256Hasher::new("server-key");

        assert_eq!(hasher.hash("pw1"), hasher.hash("pw1"));
        assert_ne!(hasher.hash("pw1"), hasher.hash("pw2"));
    }

    #[test]
    fn test_hash_matches_concatenated_digest() {
        let hasher = KeyedSha256Hasher::new("key");
        let expected = hex::encode(Sha256::digest(b"secretkey"));

        assert_eq!(hasher.hash("secret"), expected);
        assert_eq!(hasher.hash("secret").len(), 64);
    }

    #[test]
    fn test_known_vector() {
        // sha256("abc")
        let hasher = KeyedSha256Hasher::new("c");
        assert_eq!(
            hasher.hash("ab"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_key_changes_digest() {
        let a = KeyedSha256Hasher::new("key-a");
        let b = KeyedSha256Hasher::new("key-b");

        assert_ne!(a.hash("pw"), b.hash("pw"));
    }

    #[test]
    fn test_verify() {
        let hasher = KeyedSha256Hasher::new("key");
        let digest = hasher.hash("pw1");

        assert!(hasher.verify("pw1", &digest));
        assert!(!hasher.verify("wrong", &digest));
        assert!(!hasher.verify("pw1", ""));
    }

    #[test]
    fn test_debug_hides_key() {
        let hasher = KeyedSha256Hasher::new("super-secret");
        let debug = format!("{:?}", hasher);

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
