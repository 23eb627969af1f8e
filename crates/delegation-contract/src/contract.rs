//! Task contract creation and signature verification (§4.9).

use delegation_core::{generate_contract_id, PrincipalId, Timestamp};
use delegation_crypto::{sign_object, verify_object_signature, Keypair};

use crate::error::ContractError;
use crate::types::{Constraints, TaskContract, TaskSpec, VerificationMethod};

pub const CONTRACT_VERSION: &str = "0.1";

pub fn create_contract(
    issuer: &Keypair,
    task: TaskSpec,
    verification: VerificationMethod,
    constraints: Constraints,
) -> Result<TaskContract, ContractError> {
    let mut contract = TaskContract {
        id: generate_contract_id(),
        version: CONTRACT_VERSION.to_string(),
        issuer: issuer.principal.clone(),
        created_at: Timestamp::now(),
        task,
        verification,
        constraints,
        signature: String::new(),
    };
    let signature = sign_object(&issuer.private_key_bytes(), &contract.signable())
        .map_err(|e| ContractError::SigningFailed(e.to_string()))?;
    contract.signature = signature;
    Ok(contract)
}

/// True iff `contract.signature` verifies against `expected_signer` over
/// every other field.
pub fn verify_contract_signature(contract: &TaskContract, expected_signer: &PrincipalId) -> bool {
    &contract.issuer == expected_signer
        && verify_object_signature(expected_signer.as_str(), &contract.signable(), &contract.signature)
}
