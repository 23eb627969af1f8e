//! Token attenuation (§4.4): appends a narrower delegation block to an
//! existing token, signed by the current delegatee.

use delegation_core::{Capability, MicroCents, PrincipalId, Timestamp};
use delegation_crypto::{sign_object, Keypair};

use crate::effective::effective_chain;
use crate::error::DctError;
use crate::narrowing::{check_narrowing, NarrowingViolation};
use crate::types::{AttenuationBlock, Covers, SignatureEntry, SignedPrefix};

pub struct AttenuateParams {
    pub attenuator: Keypair,
    pub delegatee: PrincipalId,
    pub delegation_id: String,
    pub contract_id: String,
    pub allowed_capabilities: Option<Vec<Capability>>,
    pub max_budget_microcents: Option<MicroCents>,
    pub expires_at: Option<Timestamp>,
    pub max_chain_depth: Option<u32>,
}

impl From<NarrowingViolation> for DctError {
    fn from(v: NarrowingViolation) -> Self {
        match v {
            NarrowingViolation::CapabilityExpansion(detail) => DctError::CapabilityExpansion(detail),
            NarrowingViolation::BudgetExpansion { requested, parent } => {
                DctError::BudgetExpansion { requested, parent }
            }
            NarrowingViolation::ExpiryExpansion { requested, parent } => {
                DctError::ExpiryExpansion { requested, parent }
            }
            NarrowingViolation::ChainDepthNotNarrowed { requested, parent } => {
                DctError::ChainDepthNotNarrowed { requested, parent }
            }
        }
    }
}

/// Deserializes `serialized`, validates that `params.attenuator` is the
/// token's current delegatee, checks narrowing, appends the new attenuation
/// and signature, and reserializes.
pub fn attenuate_dct(serialized: &str, params: &AttenuateParams) -> Result<String, DctError> {
    let mut token = crate::codec::decode_token(serialized)?;

    let current_delegatee = token
        .attenuations
        .last()
        .map(|a| a.delegatee.clone())
        .unwrap_or_else(|| token.authority.delegatee.clone());

    if params.attenuator.principal != current_delegatee {
        return Err(DctError::AttenuatorMismatch {
            attenuator: params.attenuator.principal.to_string(),
            expected: current_delegatee.to_string(),
        });
    }

    let bounds = effective_chain(&token.authority, &token.attenuations);
    let effective = bounds.last().expect("effective_chain always has >=1 entry");

    check_narrowing(
        effective,
        params.allowed_capabilities.as_deref(),
        params.max_budget_microcents,
        params.expires_at.as_ref(),
        params.max_chain_depth,
    )?;

    let new_attenuation = AttenuationBlock {
        attenuator: params.attenuator.principal.clone(),
        delegatee: params.delegatee.clone(),
        delegation_id: params.delegation_id.clone(),
        contract_id: params.contract_id.clone(),
        allowed_capabilities: params.allowed_capabilities.clone(),
        max_budget_microcents: params.max_budget_microcents,
        expires_at: params.expires_at.clone(),
        max_chain_depth: params.max_chain_depth,
    };
    token.attenuations.push(new_attenuation);

    let signed_prefix = SignedPrefix {
        authority: &token.authority,
        attenuations: &token.attenuations,
    };
    let signature = sign_object(&params.attenuator.private_key_bytes(), &signed_prefix)
        .map_err(|e| DctError::SigningFailed(e.to_string()))?;

    token.signatures.push(SignatureEntry {
        signer: params.attenuator.principal.clone(),
        signature,
        covers: Covers::Attenuation(token.attenuations.len() - 1),
    });

    crate::codec::encode_token(&token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create::{create_dct, CreateDctParams};
    use delegation_core::ROOT_DELEGATION_ID;
    use delegation_crypto::generate_keypair;

    fn base_token(issuer: &delegation_crypto::Keypair, delegatee: &PrincipalId) -> String {
        create_dct(&CreateDctParams {
            issuer: issuer.clone(),
            delegatee: delegatee.clone(),
            capabilities: vec![Capability::new("docs", "read", "**")],
            contract_id: "ct_000000000000".into(),
            delegation_id: "del_000000000001".into(),
            parent_delegation_id: ROOT_DELEGATION_ID.into(),
            chain_depth: 0,
            max_chain_depth: 10,
            max_budget_microcents: 1000,
            expires_at: Timestamp("2030-01-01T00:00:00.000Z".into()),
        })
        .unwrap()
    }

    #[test]
    fn attenuator_mismatch_rejected() {
        let issuer = generate_keypair(None);
        let delegatee = generate_keypair(None);
        let impostor = generate_keypair(None);
        let token = base_token(&issuer, &delegatee.principal);

        let sub = generate_keypair(None);
        let err = attenuate_dct(
            &token,
            &AttenuateParams {
                attenuator: impostor,
                delegatee: sub.principal,
                delegation_id: "del_000000000002".into(),
                contract_id: "ct_000000000000".into(),
                allowed_capabilities: None,
                max_budget_microcents: None,
                expires_at: None,
                max_chain_depth: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, DctError::AttenuatorMismatch { .. }));
    }

    #[test]
    fn capability_expansion_rejected_s3() {
        let issuer = generate_keypair(None);
        let delegatee = generate_keypair(None);
        let token = base_token(&issuer, &delegatee.principal);

        let sub = generate_keypair(None);
        let err = attenuate_dct(
            &token,
            &AttenuateParams {
                attenuator: delegatee,
                delegatee: sub.principal,
                delegation_id: "del_000000000002".into(),
                contract_id: "ct_000000000000".into(),
                allowed_capabilities: Some(vec![Capability::new("admin", "delete", "**")]),
                max_budget_microcents: None,
                expires_at: None,
                max_chain_depth: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("expansion"));
    }

    #[test]
    fn chain_depth_must_strictly_narrow() {
        let issuer = generate_keypair(None);
        let delegatee = generate_keypair(None);
        let token = base_token(&issuer, &delegatee.principal);
        let sub = generate_keypair(None);

        let err = attenuate_dct(
            &token,
            &AttenuateParams {
                attenuator: delegatee.clone(),
                delegatee: sub.principal.clone(),
                delegation_id: "del_000000000002".into(),
                contract_id: "ct_000000000000".into(),
                allowed_capabilities: None,
                max_budget_microcents: None,
                expires_at: None,
                max_chain_depth: Some(10),
            },
        )
        .unwrap_err();
        assert!(matches!(err, DctError::ChainDepthNotNarrowed { .. }));

        assert!(attenuate_dct(
            &token,
            &AttenuateParams {
                attenuator: delegatee,
                delegatee: sub.principal,
                delegation_id: "del_000000000002".into(),
                contract_id: "ct_000000000000".into(),
                allowed_capabilities: None,
                max_budget_microcents: None,
                expires_at: None,
                max_chain_depth: Some(9),
            },
        )
        .is_ok());
    }
}
