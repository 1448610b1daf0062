//! BLAKE3 hashing utilities for definition integrity
//!
//! Installed records carry a hash of the definition text they were created
//! from, so operators can tell whether a catalog archive has drifted from
//! what is in the store.

use blake3::Hasher;

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate the BLAKE3 hash of a definition text
pub fn hash_definition(text: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(text.as_bytes());
    format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex())
}

/// Verify a hash matches the expected value
#[allow(dead_code)]
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    // Normalize both hashes (ensure prefix)
    let normalize = |h: &str| {
        if h.starts_with(HASH_PREFIX) {
            h.to_string()
        } else {
            format!("{}{}", HASH_PREFIX, h)
        }
    };

    normalize(expected) == normalize(actual)
}
