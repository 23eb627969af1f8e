//! Attestation creation and signature verification (§4.8).

use delegation_core::{generate_attestation_id, PrincipalId, Timestamp};
use delegation_crypto::{sign_object, verify_object_signature, Keypair};

use crate::types::{Attestation, AttestationResult, AttestationType};

pub const ATTESTATION_VERSION: &str = "0.1";

fn build(
    signer: &Keypair,
    contract_id: impl Into<String>,
    delegation_id: impl Into<String>,
    attestation_type: AttestationType,
    result: AttestationResult,
    child_attestations: Vec<String>,
) -> Result<Attestation, delegation_crypto::CryptoError> {
    let mut attestation = Attestation {
        id: generate_attestation_id(),
        version: ATTESTATION_VERSION.to_string(),
        contract_id: contract_id.into(),
        delegation_id: delegation_id.into(),
        principal: signer.principal.clone(),
        created_at: Timestamp::now(),
        attestation_type,
        result,
        child_attestations,
        signature: String::new(),
    };
    let signature = sign_object(&signer.private_key_bytes(), &attestation.signable())?;
    attestation.signature = signature;
    Ok(attestation)
}

/// `type = "completion"`: the signer performed the work itself.
pub fn create_completion_attestation(
    signer: &Keypair,
    contract_id: impl Into<String>,
    delegation_id: impl Into<String>,
    result: AttestationResult,
    child_attestations: Vec<String>,
) -> Result<Attestation, delegation_crypto::CryptoError> {
    build(
        signer,
        contract_id,
        delegation_id,
        AttestationType::Completion,
        result,
        child_attestations,
    )
}

/// `type = "delegation_verification"`: the signer verified work a delegatee
/// performed, rather than performing it themselves.
pub fn create_delegation_verification_attestation(
    signer: &Keypair,
    contract_id: impl Into<String>,
    delegation_id: impl Into<String>,
    result: AttestationResult,
    child_attestations: Vec<String>,
) -> Result<Attestation, delegation_crypto::CryptoError> {
    build(
        signer,
        contract_id,
        delegation_id,
        AttestationType::DelegationVerification,
        result,
        child_attestations,
    )
}

/// True iff `attestation.signature` verifies against `expected_signer` over
/// every other field. Never panics — delegates to the total
/// `verify_object_signature`.
pub fn verify_attestation_signature(attestation: &Attestation, expected_signer: &PrincipalId) -> bool {
    &attestation.principal == expected_signer
        && verify_object_signature(
            expected_signer.as_str(),
            &attestation.signable(),
            &attestation.signature,
        )
}
