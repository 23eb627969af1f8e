//! Task contract wire types (§3, §4.9): a signed description of the work to
//! be done and how its output is checked.

use delegation_core::{MicroCents, PrincipalId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub input: std::collections::BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub output_schema: Option<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMode {
    AllPass,
    Majority,
    Weighted,
}

/// A single verification step inside a `composite` spec. `method` recurses
/// into one of the non-composite variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationStep {
    #[serde(flatten)]
    pub method: VerificationMethod,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum VerificationMethod {
    SchemaMatch {
        schema: serde_json::Value,
    },
    DeterministicCheck {
        check_name: String,
        #[serde(default)]
        check_params: serde_json::Value,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        expected_result: Option<serde_json::Value>,
    },
    Composite {
        steps: Vec<VerificationStep>,
        mode: CompositeMode,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        weights: Option<Vec<f64>>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pass_threshold: Option<f64>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub max_budget_microcents: MicroCents,
    pub deadline: Timestamp,
    pub max_chain_depth: u32,
    #[serde(default)]
    pub required_capabilities: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContract {
    pub id: String,
    pub version: String,
    pub issuer: PrincipalId,
    pub created_at: Timestamp,
    pub task: TaskSpec,
    pub verification: VerificationMethod,
    pub constraints: Constraints,
    pub signature: String,
}

/// Everything a `TaskContract` signs over: every field except `signature`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignableContract<'a> {
    pub id: &'a str,
    pub version: &'a str,
    pub issuer: &'a PrincipalId,
    pub created_at: &'a Timestamp,
    pub task: &'a TaskSpec,
    pub verification: &'a VerificationMethod,
    pub constraints: &'a Constraints,
}

impl TaskContract {
    pub(crate) fn signable(&self) -> SignableContract<'_> {
        SignableContract {
            id: &self.id,
            version: &self.version,
            issuer: &self.issuer,
            created_at: &self.created_at,
            task: &self.task,
            verification: &self.verification,
            constraints: &self.constraints,
        }
    }
}
