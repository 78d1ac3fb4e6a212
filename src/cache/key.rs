// Cache key derivation.
// Entries are keyed by a SHA-256 fingerprint of the fully resolved request URL.

use sha2::{Digest, Sha256};

const KEY_PREFIX: &str = "ckan.";

/// Deterministic cache key for a resolved request URL.
pub fn fingerprint(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("{}{}", KEY_PREFIX, hex::encode(digest))
}
