//! RFC 8785 (JSON Canonicalization Scheme) wrapper. Every signature in the
//! system covers the canonical bytes of some value; a canonicalization bug
//! here silently invalidates every signature downstream, so this module is
//! deliberately a thin pass-through to a vetted implementation rather than a
//! hand-rolled serializer.

use serde::Serialize;

use crate::error::CryptoError;

/// Canonicalize `value` to UTF-8 JCS bytes: sorted object keys (UTF-16
/// code-unit order), numbers in shortest normalized form.
pub fn canonicalize<T: Serialize>(value: &T) -> Result<Vec<u8>, CryptoError> {
    serde_jcs::to_vec(value).map_err(|e| CryptoError::Canonicalize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_is_irrelevant() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(canonicalize(&a).unwrap(), canonicalize(&b).unwrap());
    }

    #[test]
    fn idempotent_through_reparse() {
        let v = json!({"z": [1, 2, 3], "a": "hi", "nested": {"k": true}});
        let once = canonicalize(&v).unwrap();
        let reparsed: serde_json::Value = serde_json::from_slice(&once).unwrap();
        let twice = canonicalize(&reparsed).unwrap();
        assert_eq!(once, twice);
    }
}
