//! Canonical JSON and SHA-256 digests of simulation inputs.
//!
//! Two inputs that differ only in key order or in how an integral number is
//! spelled (`3` vs `3.0`) hash to the same digest, so a stored run can be
//! matched back to the scenario that produced it.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::error::{Result, SimError};

/// Recursively rebuild objects with lexicographically sorted keys.
fn sort_keys(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for key in keys {
                if let Some(v) = map.get(key) {
                    sorted.insert(key.clone(), sort_keys(v));
                }
            }
            serde_json::Value::Object(sorted)
        }
        serde_json::Value::Array(arr) => serde_json::Value::Array(arr.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Integer-valued floats become integers; NaN/Infinity are rejected.
fn normalize_numbers(value: &serde_json::Value) -> Result<serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                out.insert(k.clone(), normalize_numbers(v)?);
            }
            Ok(serde_json::Value::Object(out))
        }
        serde_json::Value::Array(arr) => Ok(serde_json::Value::Array(
            arr.iter()
                .map(normalize_numbers)
                .collect::<Result<Vec<_>>>()?,
        )),
        serde_json::Value::Number(n) if !(n.is_i64() || n.is_u64()) => {
            let Some(f) = n.as_f64() else {
                return Ok(value.clone());
            };
            if !f.is_finite() {
                return Err(SimError::Canonicalization(
                    "NaN/Infinity not permitted in canonical JSON".to_string(),
                ));
            }
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                Ok(serde_json::Value::Number(serde_json::Number::from(f as i64)))
            } else {
                Ok(value.clone())
            }
        }
        other => Ok(other.clone()),
    }
}

/// Canonical compact JSON: normalized numbers, sorted keys.
pub fn canonical_json(value: &serde_json::Value) -> Result<String> {
    let normalized = normalize_numbers(value)?;
    Ok(serde_json::to_string(&sort_keys(&normalized))?)
}

/// SHA-256 hex digest of the canonical JSON of any serializable value.
pub fn compute_digest<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_value(value)?;
    let canonical = canonical_json(&json)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
