//! The delegation record (§3) and its status state machine (§4.10).

use delegation_core::{PrincipalId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationStatus {
    Active,
    Completed,
    Failed,
    Revoked,
}

impl DelegationStatus {
    /// `completed`, `failed`, and `revoked` are terminal — no further
    /// transition is ever valid once reached (§4.10).
    pub fn is_terminal(self) -> bool {
        !matches!(self, DelegationStatus::Active)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delegation {
    pub id: String,
    pub parent_id: String,
    pub from: PrincipalId,
    pub to: PrincipalId,
    pub contract_id: String,
    /// The serialized DCT this record tracks. The chain store never parses
    /// or verifies this — that is `delegation_dct`'s job; here it is opaque
    /// bytes kept alongside the structural record.
    pub dct: String,
    pub depth: u32,
    pub status: DelegationStatus,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub completed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attestation_id: Option<String>,
}
