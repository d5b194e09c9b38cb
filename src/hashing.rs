//! Document Fingerprints - SHA-256 over Canonical JSON
//!
//! Identifies an expanded document independently of mapping key order.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::document::Spec1Document;

/// SHA-256 of `data` as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Canonical JSON: keys sorted at every depth, no whitespace
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v = serde_json::to_value(value)?;
    serde_json::to_string(&sort_value(v))
}

fn sort_value(v: Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_value).collect()),
        other => other,
    }
}

/// Fingerprint of an expanded document
pub fn fingerprint(doc: &Spec1Document) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(canonical_json(doc)?.as_bytes()))
}
