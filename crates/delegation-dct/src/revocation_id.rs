//! A block's revocation id is `base64url(blake2b256(canonicalize(block)))`,
//! computed over that block alone — stable even after later blocks are
//! appended to the token (§3, §6).

use delegation_crypto::{b64url_encode, blake2b256, canonicalize, CryptoError};
use serde::Serialize;

use crate::types::{AttenuationBlock, AuthorityBlock};

pub fn revocation_id_of<T: Serialize>(block: &T) -> Result<String, CryptoError> {
    let canonical = canonicalize(block)?;
    Ok(b64url_encode(blake2b256(canonical)))
}

pub fn revocation_id_of_authority(block: &AuthorityBlock) -> String {
    revocation_id_of(block).expect("AuthorityBlock always canonicalizes")
}

pub fn revocation_id_of_attenuation(block: &AttenuationBlock) -> String {
    revocation_id_of(block).expect("AttenuationBlock always canonicalizes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use delegation_core::{Capability, ROOT_DELEGATION_ID};
    use delegation_core::{PrincipalId, Timestamp};

    fn sample_authority() -> AuthorityBlock {
        AuthorityBlock {
            issuer: PrincipalId::from("issuer"),
            delegatee: PrincipalId::from("delegatee"),
            capabilities: vec![Capability::new("code", "read", "**")],
            contract_id: "ct_000000000000".into(),
            delegation_id: "del_000000000001".into(),
            parent_delegation_id: ROOT_DELEGATION_ID.into(),
            chain_depth: 0,
            max_chain_depth: 10,
            max_budget_microcents: 1000,
            expires_at: Timestamp("2030-01-01T00:00:00.000Z".into()),
            issued_at: Timestamp("2026-01-01T00:00:00.000Z".into()),
        }
    }

    #[test]
    fn stable_for_identical_content() {
        let a = sample_authority();
        let b = sample_authority();
        assert_eq!(revocation_id_of_authority(&a), revocation_id_of_authority(&b));
    }

    #[test]
    fn sensitive_to_content_changes() {
        let a = sample_authority();
        let mut b = sample_authority();
        b.max_budget_microcents = 999;
        assert_ne!(revocation_id_of_authority(&a), revocation_id_of_authority(&b));
    }
}
