use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::Serialize;

use crate::canonical::canonicalize;
use crate::encoding::b64url_decode;
use crate::error::CryptoError;
use crate::hash::blake2b256;

/// Signs `message` with a raw 32-byte Ed25519 private key.
pub fn sign(private_key: &[u8], message: &[u8]) -> Result<[u8; 64], CryptoError> {
    let key_bytes: [u8; 32] = private_key
        .try_into()
        .map_err(|_| CryptoError::InvalidKey(private_key.len()))?;
    let signing_key = SigningKey::from_bytes(&key_bytes);
    Ok(signing_key.sign(message).to_bytes())
}

/// Verifies an Ed25519 signature. Never raises: any malformed input (wrong
/// key length, wrong signature length, bad bytes) simply yields `false`.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(key_bytes): Result<[u8; 32], _> = public_key.try_into() else {
        return false;
    };
    let Ok(sig_bytes): Result<[u8; 64], _> = signature.try_into() else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    let signature = Signature::from_bytes(&sig_bytes);
    verifying_key.verify(message, &signature).is_ok()
}

/// `sign(private_key, blake2b256(canonicalize(value)))`, base64url-encoded.
pub fn sign_object<T: Serialize>(private_key: &[u8], value: &T) -> Result<String, CryptoError> {
    let canonical = canonicalize(value)?;
    let digest = blake2b256(canonical);
    let signature = sign(private_key, &digest)?;
    Ok(crate::encoding::b64url_encode(signature))
}

/// Verifies a base64url-encoded object signature. Never raises: malformed
/// base64, wrong lengths, or verification failure all yield `false`.
pub fn verify_object_signature<T: Serialize>(
    public_key_b64: &str,
    value: &T,
    signature_b64: &str,
) -> bool {
    let Ok(public_key) = b64url_decode(public_key_b64) else {
        return false;
    };
    let Ok(signature) = b64url_decode(signature_b64) else {
        return false;
    };
    let Ok(canonical) = canonicalize(value) else {
        return false;
    };
    let digest = blake2b256(canonical);
    verify(&public_key, &digest, &signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::generate_keypair;
    use serde_json::json;

    #[test]
    fn sign_and_verify_round_trip() {
        let kp = generate_keypair(None);
        let msg = b"hello";
        let sig = sign(&kp.private_key_bytes(), msg).unwrap();
        assert!(verify(&kp.public_key_bytes(), msg, &sig));
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let kp = generate_keypair(None);
        let other = generate_keypair(None);
        let msg = b"hello";
        let sig = sign(&kp.private_key_bytes(), msg).unwrap();
        assert!(!verify(&other.public_key_bytes(), msg, &sig));
    }

    #[test]
    fn verify_never_panics_on_malformed_input() {
        assert!(!verify(&[0u8; 4], b"x", &[0u8; 4]));
    }

    #[test]
    fn sign_object_flips_on_single_byte_tamper() {
        let kp = generate_keypair(None);
        let value = json!({"a": 1, "b": "two"});
        let sig = sign_object(&kp.private_key_bytes(), &value).unwrap();
        assert!(verify_object_signature(kp.principal.as_str(), &value, &sig));

        let tampered = json!({"a": 2, "b": "two"});
        assert!(!verify_object_signature(
            kp.principal.as_str(),
            &tampered,
            &sig
        ));
    }

    #[test]
    fn sign_fails_on_wrong_key_length() {
        assert!(matches!(
            sign(&[0u8; 10], b"x"),
            Err(CryptoError::InvalidKey(10))
        ));
    }
}
