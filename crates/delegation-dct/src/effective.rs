//! Effective-bounds folding (§4.4 step 3, §4.5 step 6): an attenuation's
//! absent fields inherit the parent's effective value, present fields
//! override it. Shared by creation-time narrowing validation and
//! verification-time re-validation of the whole chain.

use delegation_core::{Capability, MicroCents, PrincipalId, Timestamp};

use crate::types::{AttenuationBlock, AuthorityBlock};

#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveBounds {
    pub capabilities: Vec<Capability>,
    pub budget: MicroCents,
    pub expiry: Timestamp,
    pub max_chain_depth: u32,
    pub delegatee: PrincipalId,
}

impl EffectiveBounds {
    pub fn from_authority(authority: &AuthorityBlock) -> Self {
        Self {
            capabilities: authority.capabilities.clone(),
            budget: authority.max_budget_microcents,
            expiry: authority.expires_at.clone(),
            max_chain_depth: authority.max_chain_depth,
            delegatee: authority.delegatee.clone(),
        }
    }

    /// Applies an attenuation's overrides unconditionally — narrowing rules
    /// are validated separately; this just computes what the resulting
    /// effective bounds *would* be.
    pub fn apply(&self, attenuation: &AttenuationBlock) -> Self {
        Self {
            capabilities: attenuation
                .allowed_capabilities
                .clone()
                .unwrap_or_else(|| self.capabilities.clone()),
            budget: attenuation.max_budget_microcents.unwrap_or(self.budget),
            expiry: attenuation
                .expires_at
                .clone()
                .unwrap_or_else(|| self.expiry.clone()),
            max_chain_depth: attenuation.max_chain_depth.unwrap_or(self.max_chain_depth),
            delegatee: attenuation.delegatee.clone(),
        }
    }
}

/// `chain[0]` is the authority's effective bounds; `chain[k]` (k >= 1) is the
/// effective bounds after applying `attenuations[0..k]`. Length is always
/// `attenuations.len() + 1`.
pub fn effective_chain(
    authority: &AuthorityBlock,
    attenuations: &[AttenuationBlock],
) -> Vec<EffectiveBounds> {
    let mut out = Vec::with_capacity(attenuations.len() + 1);
    let mut current = EffectiveBounds::from_authority(authority);
    out.push(current.clone());
    for attenuation in attenuations {
        current = current.apply(attenuation);
        out.push(current.clone());
    }
    out
}
