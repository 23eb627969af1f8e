//! Opaque identifier minting: `{prefix}_` followed by 12 lowercase hex
//! characters derived from 6 cryptographically random bytes.

use rand::RngCore;

/// Root-of-chain sentinel: the `parentId` of a depth-0 delegation.
pub const ROOT_DELEGATION_ID: &str = "del_000000000000";

fn random_suffix() -> String {
    let mut bytes = [0u8; 6];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn generate_delegation_id() -> String {
    format!("del_{}", random_suffix())
}

pub fn generate_attestation_id() -> String {
    format!("att_{}", random_suffix())
}

pub fn generate_contract_id() -> String {
    format!("ct_{}", random_suffix())
}
