//! base64url encoding with `=` padding stripped, tolerant of missing (or,
//! for that matter, present) padding on decode.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::error::CryptoError;

pub fn b64url_encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes base64url whether or not the input carries `=` padding.
pub fn b64url_decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    URL_SAFE_NO_PAD
        .decode(s)
        .or_else(|_| URL_SAFE.decode(s))
        .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let bytes = b"hello capability world";
        let encoded = b64url_encode(bytes);
        assert!(!encoded.contains('='));
        assert_eq!(b64url_decode(&encoded).unwrap(), bytes);
    }

    #[test]
    fn tolerates_padded_input() {
        let padded = "aGVsbG8="; // "hello" with padding
        assert_eq!(b64url_decode(padded).unwrap(), b"hello");
    }
}
