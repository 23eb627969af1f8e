//! Signed revocation entries. A `RevocationEntry` asserts that whichever DCT
//! block hashes to `revocation_id` must be treated as revoked, irrespective
//! of which token or chain position that block appears in — see
//! `delegation_dct::revocation_id_of` for how blocks derive that id.

use delegation_core::{PrincipalId, Timestamp};
use delegation_crypto::Keypair;
use serde::{Deserialize, Serialize};

use crate::error::RevocationError;

/// Advisory metadata only (§3, §9a): the engine treats any matching id as
/// revoked regardless of scope. `Chain` exists so a revoker can express
/// intent ("this should cascade") even though today's engine doesn't
/// interpret it differently from `Block`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationScope {
    Block,
    Chain,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationEntry {
    pub revocation_id: String,
    pub revoked_by: PrincipalId,
    pub revoked_at: Timestamp,
    pub scope: RevocationScope,
    pub signature: String,
}

/// Everything a `RevocationEntry` signs over, i.e. every field except
/// `signature` itself.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignablePart<'a> {
    revocation_id: &'a str,
    revoked_by: &'a PrincipalId,
    revoked_at: &'a Timestamp,
    scope: &'a RevocationScope,
}

impl RevocationEntry {
    fn signable(&self) -> SignablePart<'_> {
        SignablePart {
            revocation_id: &self.revocation_id,
            revoked_by: &self.revoked_by,
            revoked_at: &self.revoked_at,
            scope: &self.scope,
        }
    }

    /// True iff `signature` verifies against `revoked_by` over every other
    /// field. Never panics on malformed signatures/keys — delegates to
    /// `delegation_crypto::verify_object_signature`, which is itself total.
    pub fn verify(&self) -> bool {
        delegation_crypto::verify_object_signature(
            self.revoked_by.as_str(),
            &self.signable(),
            &self.signature,
        )
    }
}

/// Builds a `RevocationEntry` signed by `signer`, timestamped `revoked_at`.
pub fn create_revocation_entry(
    signer: &Keypair,
    revocation_id: impl Into<String>,
    scope: RevocationScope,
    revoked_at: Timestamp,
) -> Result<RevocationEntry, RevocationError> {
    let revocation_id = revocation_id.into();
    let unsigned = SignablePart {
        revocation_id: &revocation_id,
        revoked_by: &signer.principal,
        revoked_at: &revoked_at,
        scope: &scope,
    };
    let signature = delegation_crypto::sign_object(&signer.private_key_bytes(), &unsigned)
        .map_err(|_| RevocationError::InvalidSignature)?;
    Ok(RevocationEntry {
        revocation_id,
        revoked_by: signer.principal.clone(),
        revoked_at,
        scope,
        signature,
    })
}
