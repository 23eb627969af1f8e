//! Signed outcome records (§3, §4.8): a principal's claim that work under a
//! delegation completed (or was itself verified), covering cost, duration,
//! and output.

use delegation_core::{PrincipalId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationType {
    Completion,
    DelegationVerification,
}

/// The outcome a `verifyOutput` dispatch produced, carried on an
/// attestation's result when the work was itself subject to automated
/// verification (§4.9). Kept minimal here; the full `CheckResult` shape
/// lives in `delegation-contract`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResult {
    pub success: bool,
    pub cost_microcents: u64,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub output: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub output_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub verification_outcome: Option<VerificationOutcome>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    pub id: String,
    pub version: String,
    pub contract_id: String,
    pub delegation_id: String,
    pub principal: PrincipalId,
    pub created_at: Timestamp,
    #[serde(rename = "type")]
    pub attestation_type: AttestationType,
    pub result: AttestationResult,
    #[serde(default)]
    pub child_attestations: Vec<String>,
    pub signature: String,
}

/// Everything an `Attestation` signs over: every field except `signature`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignableAttestation<'a> {
    pub id: &'a str,
    pub version: &'a str,
    pub contract_id: &'a str,
    pub delegation_id: &'a str,
    pub principal: &'a PrincipalId,
    pub created_at: &'a Timestamp,
    #[serde(rename = "type")]
    pub attestation_type: &'a AttestationType,
    pub result: &'a AttestationResult,
    pub child_attestations: &'a [String],
}

impl Attestation {
    pub(crate) fn signable(&self) -> SignableAttestation<'_> {
        SignableAttestation {
            id: &self.id,
            version: &self.version,
            contract_id: &self.contract_id,
            delegation_id: &self.delegation_id,
            principal: &self.principal,
            created_at: &self.created_at,
            attestation_type: &self.attestation_type,
            result: &self.result,
            child_attestations: &self.child_attestations,
        }
    }
}
