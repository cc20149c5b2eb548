//! Hashing System - SHA-512 for seeds, SHA-256 for content addressing
//!
//! Every hash here must be stable across runs and platforms.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256, Sha512};

/// Raw SHA-512 digest of `data`
pub fn sha512_digest(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(data);
    let mut digest = [0u8; 64];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Cache key for a render request:
/// request_hash = sha256(canonical_request + ":" + engine_version)
pub fn compute_request_hash(
    request: &impl Serialize,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(request)?;
    let combined = format!("{}:{}", canonical, engine_version);
    Ok(sha256_hex(combined.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": {"b": 1, "a": 2}});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":{"a":2,"b":1},"z":1}"#);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha512_leading_bytes() {
        // SHA-512("abc") = ddaf35a1...
        let digest = sha512_digest(b"abc");
        assert_eq!(&digest[..4], &[0xdd, 0xaf, 0x35, 0xa1]);
    }

    #[test]
    fn test_request_hash_depends_on_engine_version() {
        let request = json!({"text": "Hello", "seed": null});
        let h1 = compute_request_hash(&request, "1.0.0").unwrap();
        let h2 = compute_request_hash(&request, "1.0.0").unwrap();
        let h3 = compute_request_hash(&request, "2.0.0").unwrap();
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }
}
