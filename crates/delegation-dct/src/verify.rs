//! Token verification (§4.5): the only place all of signature-chain
//! validation, revocation, expiry, budget, chain-depth and capability
//! checking are threaded together.

use std::collections::HashSet;

use delegation_core::{match_capability, Capability, MicroCents, PrincipalId, Timestamp};
use delegation_crypto::verify_object_signature;

use crate::effective::{effective_chain, EffectiveBounds};
use crate::narrowing::{check_narrowing, NarrowingViolation};
use crate::revocation_id::{revocation_id_of_attenuation, revocation_id_of_authority};
use crate::types::{Covers, DctToken, SignedAuthority, SignedPrefix};

pub const DEFAULT_MAX_CHAIN_DEPTH: u32 = 10;

/// Everything a caller must supply to verify a token (§4.5 step 0 inputs).
#[derive(Clone, Debug)]
pub struct VerificationContext {
    /// The operation-scoped namespace; `None` matches the source's
    /// documented fallback of an empty-string namespace in denial messages
    /// (§9, open question — resolved as "report empty string").
    pub namespace: Option<String>,
    pub operation: String,
    pub resource: String,
    pub now: Timestamp,
    pub spent_microcents: MicroCents,
    pub root_public_key: PrincipalId,
    pub revocation_ids: HashSet<String>,
    /// `None` uses `DEFAULT_MAX_CHAIN_DEPTH` (10), per §4.5 step 7.
    pub max_chain_depth: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthorizedScope {
    pub capabilities: Vec<Capability>,
    pub remaining_budget_microcents: MicroCents,
    pub chain_depth: u32,
    pub max_chain_depth: u32,
    pub contract_id: String,
    pub delegation_id: String,
}

/// The denial taxonomy (§7). Every variant carries enough context to audit
/// the decision without re-running verification.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DenialReason {
    #[error("token expired at {effective_expiry}, now is {now}")]
    Expired {
        effective_expiry: String,
        now: String,
    },

    #[error("revoked: {0}")]
    Revoked(String),

    #[error("capability not granted: requested {requested:?}, granted {granted:?}")]
    CapabilityNotGranted {
        requested: RequestedCapability,
        granted: Vec<Capability>,
    },

    #[error("budget exceeded: limit {limit}, spent {spent}")]
    BudgetExceeded { limit: MicroCents, spent: MicroCents },

    #[error("chain depth exceeded: max {max}, actual {actual}")]
    ChainDepthExceeded { max: u32, actual: u32 },

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("attenuation violation: {0}")]
    AttenuationViolation(String),

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// The capability a caller requested, as it appears in a
/// `CapabilityNotGranted` denial. Namespace is `""` when the caller omitted
/// one — matching the documented fallback behaviour rather than requiring
/// the field (see DESIGN.md).
#[derive(Clone, Debug, PartialEq)]
pub struct RequestedCapability {
    pub namespace: String,
    pub action: String,
    pub resource: String,
}

impl From<NarrowingViolation> for DenialReason {
    fn from(v: NarrowingViolation) -> Self {
        DenialReason::AttenuationViolation(v.to_string())
    }
}

/// Verifies a serialized (base64url-wrapped) or bare-JSON DCT token against
/// `context`. Returns the authorized scope or a tagged denial reason — never
/// panics on malformed input.
pub fn verify_dct(serialized: &str, context: &VerificationContext) -> Result<AuthorizedScope, DenialReason> {
    let token = crate::codec::decode_token(serialized)
        .map_err(|e| DenialReason::Malformed(e.to_string()))?;
    verify_token(&token, context)
}

pub(crate) fn verify_token(
    token: &DctToken,
    context: &VerificationContext,
) -> Result<AuthorizedScope, DenialReason> {
    // Step 2: revocation check happens before any signature work, so a
    // revoked-but-otherwise-invalid token still surfaces as `Revoked`.
    check_revocation(token, &context.revocation_ids)?;

    // Step 3-5: signature structure and chain.
    verify_signature_chain(token, context)?;

    // Step 6: attenuation traversal (narrowing already checked above as part
    // of signature-chain validation order, but we still need the resulting
    // effective bounds).
    let bounds = effective_chain(&token.authority, &token.attenuations);
    let effective = bounds.last().expect("effective_chain always has >=1 entry");

    // Step 7: chain depth.
    let depth_limit = context.max_chain_depth.unwrap_or(DEFAULT_MAX_CHAIN_DEPTH);
    let actual_depth = token.authority.chain_depth + token.attenuations.len() as u32;
    if actual_depth > depth_limit {
        return Err(DenialReason::ChainDepthExceeded {
            max: depth_limit,
            actual: actual_depth,
        });
    }

    // Step 8: expiry, lexicographic ISO-8601 comparison.
    if context.now.as_str() > effective.expiry.as_str() {
        return Err(DenialReason::Expired {
            effective_expiry: effective.expiry.as_str().to_string(),
            now: context.now.as_str().to_string(),
        });
    }

    // Step 9: budget.
    if context.spent_microcents >= effective.budget {
        return Err(DenialReason::BudgetExceeded {
            limit: effective.budget,
            spent: context.spent_microcents,
        });
    }

    // Step 10: capability.
    let namespace = context.namespace.clone().unwrap_or_default();
    let matched = effective
        .capabilities
        .iter()
        .any(|cap| match_capability(cap, &namespace, &context.operation, &context.resource));
    if !matched {
        return Err(DenialReason::CapabilityNotGranted {
            requested: RequestedCapability {
                namespace,
                action: context.operation.clone(),
                resource: context.resource.clone(),
            },
            granted: effective.capabilities.clone(),
        });
    }

    // Step 11: contractId/delegationId come from the last attenuation if
    // present, else the authority.
    let (contract_id, delegation_id) = match token.attenuations.last() {
        Some(tail) => (tail.contract_id.clone(), tail.delegation_id.clone()),
        None => (
            token.authority.contract_id.clone(),
            token.authority.delegation_id.clone(),
        ),
    };

    Ok(AuthorizedScope {
        capabilities: effective.capabilities.clone(),
        remaining_budget_microcents: effective.budget - context.spent_microcents,
        chain_depth: actual_depth,
        max_chain_depth: effective.max_chain_depth,
        contract_id,
        delegation_id,
    })
}

fn check_revocation(token: &DctToken, revocation_ids: &HashSet<String>) -> Result<(), DenialReason> {
    let authority_id = revocation_id_of_authority(&token.authority);
    if revocation_ids.contains(&authority_id) {
        return Err(DenialReason::Revoked(authority_id));
    }
    for attenuation in &token.attenuations {
        let id = revocation_id_of_attenuation(attenuation);
        if revocation_ids.contains(&id) {
            return Err(DenialReason::Revoked(id));
        }
    }
    Ok(())
}

fn verify_signature_chain(token: &DctToken, context: &VerificationContext) -> Result<(), DenialReason> {
    let first = token
        .signatures
        .first()
        .ok_or_else(|| DenialReason::InvalidSignature("missing authority signature".into()))?;
    if first.covers != Covers::Authority {
        return Err(DenialReason::InvalidSignature(
            "first signature must cover \"authority\"".into(),
        ));
    }
    if token.authority.issuer != context.root_public_key {
        return Err(DenialReason::InvalidSignature(
            "authority issuer does not match trusted root public key".into(),
        ));
    }
    let signed_authority = SignedAuthority {
        authority: &token.authority,
    };
    if !verify_object_signature(first.signer.as_str(), &signed_authority, &first.signature) {
        return Err(DenialReason::InvalidSignature(
            "authority signature does not verify".into(),
        ));
    }

    if token.signatures.len() != 1 + token.attenuations.len() {
        return Err(DenialReason::InvalidSignature(format!(
            "expected {} signatures, got {}",
            1 + token.attenuations.len(),
            token.signatures.len()
        )));
    }

    let mut previous_delegatee = token.authority.delegatee.clone();
    let mut effective = EffectiveBounds::from_authority(&token.authority);
    for (i, attenuation) in token.attenuations.iter().enumerate() {
        let sig = &token.signatures[i + 1];
        if sig.covers != Covers::Attenuation(i) {
            return Err(DenialReason::InvalidSignature(format!(
                "signature {} covers {:?}, expected Attenuation({i})",
                i + 1,
                sig.covers
            )));
        }
        if attenuation.attenuator != previous_delegatee {
            return Err(DenialReason::AttenuationViolation(format!(
                "attenuation {i}: attenuator {} does not match current delegatee {}",
                attenuation.attenuator, previous_delegatee
            )));
        }
        if sig.signer != attenuation.attenuator {
            return Err(DenialReason::InvalidSignature(format!(
                "signature {} signer does not match attenuation {i} attenuator",
                i + 1
            )));
        }
        let signed_prefix = SignedPrefix {
            authority: &token.authority,
            attenuations: &token.attenuations[..=i],
        };
        if !verify_object_signature(sig.signer.as_str(), &signed_prefix, &sig.signature) {
            return Err(DenialReason::InvalidSignature(format!(
                "attenuation {i} signature does not verify"
            )));
        }

        check_narrowing(
            &effective,
            attenuation.allowed_capabilities.as_deref(),
            attenuation.max_budget_microcents,
            attenuation.expires_at.as_ref(),
            attenuation.max_chain_depth,
        )
        .map_err(DenialReason::from)?;

        effective = effective.apply(attenuation);
        previous_delegatee = attenuation.delegatee.clone();
    }

    Ok(())
}

/// Verification without any signature checks (§4.5, `inspectDCT`): returns
/// the effective bounds and every block's revocation id. Useful for
/// UIs/audits that want to show a token's shape without a trusted root key.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenInspection {
    pub effective: EffectiveBounds,
    pub revocation_ids: Vec<String>,
    pub chain_depth: u32,
}

pub fn inspect_dct(serialized: &str) -> Result<TokenInspection, DenialReason> {
    let token =
        crate::codec::decode_token(serialized).map_err(|e| DenialReason::Malformed(e.to_string()))?;
    let bounds = effective_chain(&token.authority, &token.attenuations);
    let effective = bounds.last().expect("effective_chain always has >=1 entry").clone();

    let mut revocation_ids = vec![revocation_id_of_authority(&token.authority)];
    revocation_ids.extend(token.attenuations.iter().map(revocation_id_of_attenuation));

    Ok(TokenInspection {
        effective,
        revocation_ids,
        chain_depth: token.authority.chain_depth + token.attenuations.len() as u32,
    })
}
