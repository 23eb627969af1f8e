//! Wire envelope for a serialized DCT (§6): `{token: <base64url of the
//! canonical-JSON token object>, format: "delegateos-sjt-v1"}`. The envelope
//! itself is not signed or canonicalized — it is just transport packaging
//! around the signed `DctToken`.

use delegation_crypto::{b64url_decode, b64url_encode, canonicalize};
use serde::{Deserialize, Serialize};

use crate::error::DctError;
use crate::types::{DctToken, SJT_FORMAT};

#[derive(Serialize, Deserialize)]
struct SerializedEnvelope {
    token: String,
    format: String,
}

/// Canonicalizes `token`, base64url-encodes the bytes, and wraps them in the
/// `{token, format}` envelope as a JSON string.
pub fn encode_token(token: &DctToken) -> Result<String, DctError> {
    let canonical = canonicalize(token).map_err(|e| DctError::Malformed(e.to_string()))?;
    let envelope = SerializedEnvelope {
        token: b64url_encode(canonical),
        format: SJT_FORMAT.to_string(),
    };
    serde_json::to_string(&envelope).map_err(|e| DctError::Malformed(e.to_string()))
}

/// Accepts either the `{token, format}` envelope or a bare `DctToken` JSON
/// object, to tolerate callers that store the decoded token directly.
pub fn decode_token(serialized: &str) -> Result<DctToken, DctError> {
    if let Ok(envelope) = serde_json::from_str::<SerializedEnvelope>(serialized) {
        let bytes = b64url_decode(&envelope.token).map_err(|e| DctError::Malformed(e.to_string()))?;
        return serde_json::from_slice(&bytes).map_err(|e| DctError::Malformed(e.to_string()));
    }
    serde_json::from_str(serialized).map_err(|e| DctError::Malformed(e.to_string()))
}
