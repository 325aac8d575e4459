//! Stable hashing helpers.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::CrunchError;
use crate::serde::to_canonical_json_bytes;

/// Computes a stable hexadecimal hash for the provided serializable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, CrunchError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(content_digest(&bytes))
}

/// Hex encoded SHA256 of raw bytes.
pub fn content_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_hash_ignores_key_order() {
        let a = serde_json::json!({"alg": "RGA", "data": "g1.json"});
        let b = serde_json::json!({"data": "g1.json", "alg": "RGA"});
        assert_eq!(stable_hash_string(&a).unwrap(), stable_hash_string(&b).unwrap());
    }

    #[test]
    fn digest_of_empty_input() {
        assert_eq!(
            content_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
