//! Canonical byte production for hashed payloads.
//!
//! [`CanonicalBytes`] is the only construction path for bytes that enter a
//! block digest. Its inner buffer is private, so every caller that hashes a
//! record goes through the same serialization rule at creation time and at
//! validation time.
//!
//! The rule: serialize to a JSON value, reject non-integer numbers, sort
//! object keys lexicographically at every nesting level, and emit compact
//! JSON (no whitespace). Key order is independent of struct field order and
//! of whether `serde_json` was built with `preserve_order`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::hasher::HasherError;

/// Bytes produced exclusively by canonical serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`HasherError::FloatRejected`] if the value contains a
    /// non-integer number, and [`HasherError::Serialization`] if the value
    /// cannot be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, HasherError> {
        let value =
            serde_json::to_value(obj).map_err(|e| HasherError::Serialization(e.to_string()))?;
        let canonical = canonicalize(value)?;
        let bytes = serde_json::to_vec(&canonical)
            .map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn canonicalize(value: Value) -> Result<Value, HasherError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value),
        Value::Number(ref n) => {
            if !n.is_i64() && !n.is_u64() {
                return Err(HasherError::FloatRejected(n.to_string()));
            }
            Ok(value)
        }
        Value::Array(items) => items
            .into_iter()
            .map(canonicalize)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, v) in entries {
                sorted.insert(key, canonicalize(v)?);
            }
            Ok(Value::Object(sorted))
        }
    }
}
