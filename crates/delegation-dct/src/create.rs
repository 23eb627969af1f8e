//! Token creation (§4.3): assembles the authority block, signs it, and
//! encodes the result. No semantic validation beyond signing — callers
//! (brokers, orchestrators) own meaningful initial bounds.

use delegation_core::{Capability, MicroCents, PrincipalId, Timestamp};
use delegation_crypto::{sign_object, Keypair};

use crate::error::DctError;
use crate::types::{AuthorityBlock, Covers, DctToken, SignatureEntry, SignedAuthority, SJT_FORMAT};

pub struct CreateDctParams {
    pub issuer: Keypair,
    pub delegatee: PrincipalId,
    pub capabilities: Vec<Capability>,
    pub contract_id: String,
    pub delegation_id: String,
    pub parent_delegation_id: String,
    pub chain_depth: u32,
    pub max_chain_depth: u32,
    pub max_budget_microcents: MicroCents,
    pub expires_at: Timestamp,
}

/// Creates a serialized DCT: stamps `issuedAt = now`, signs `{authority}`
/// with the issuer's private key, and wraps the result in the wire envelope.
pub fn create_dct(params: &CreateDctParams) -> Result<String, DctError> {
    let authority = AuthorityBlock {
        issuer: params.issuer.principal.clone(),
        delegatee: params.delegatee.clone(),
        capabilities: params.capabilities.clone(),
        contract_id: params.contract_id.clone(),
        delegation_id: params.delegation_id.clone(),
        parent_delegation_id: params.parent_delegation_id.clone(),
        chain_depth: params.chain_depth,
        max_chain_depth: params.max_chain_depth,
        max_budget_microcents: params.max_budget_microcents,
        expires_at: params.expires_at.clone(),
        issued_at: Timestamp::now(),
    };

    let signed = SignedAuthority {
        authority: &authority,
    };
    let signature = sign_object(&params.issuer.private_key_bytes(), &signed)
        .map_err(|e| DctError::SigningFailed(e.to_string()))?;

    let token = DctToken {
        format: SJT_FORMAT.to_string(),
        authority,
        attenuations: vec![],
        signatures: vec![SignatureEntry {
            signer: params.issuer.principal.clone(),
            signature,
            covers: Covers::Authority,
        }],
    };

    crate::codec::encode_token(&token)
}
