//! Unified output verification (§4.9): dispatches a contract's
//! `VerificationMethod` over a schema-match, deterministic-check, or
//! composite evaluation. Synchronous in v0.1, but `CheckOutcome` is a plain
//! enum a future async variant (LLM judge, human review) can be added to
//! without breaking existing callers — no trait object or `dyn Future` is
//! threaded through the synchronous call path today.

use serde_json::Value;

use crate::checks::{CheckFunctionRegistry, CheckResult};
use crate::error::ContractError;
use crate::types::{CompositeMode, TaskContract, VerificationMethod, VerificationStep};

/// The result of dispatching one verification method. Today always
/// `Ready` — reserved so a future asynchronous verifier can return
/// `Pending` without changing `verify_output`'s signature for existing
/// synchronous callers (§4.9, "future-compatible container").
#[derive(Clone, Debug, PartialEq)]
pub enum CheckOutcome {
    Ready(CheckResult),
}

impl CheckOutcome {
    pub fn into_result(self) -> CheckResult {
        match self {
            CheckOutcome::Ready(result) => result,
        }
    }
}

pub fn verify_output(
    contract: &TaskContract,
    output: &Value,
    registry: &CheckFunctionRegistry,
) -> Result<CheckOutcome, ContractError> {
    let result = verify_method(&contract.verification, output, registry)?;
    Ok(CheckOutcome::Ready(result))
}

fn verify_method(
    method: &VerificationMethod,
    output: &Value,
    registry: &CheckFunctionRegistry,
) -> Result<CheckResult, ContractError> {
    match method {
        VerificationMethod::SchemaMatch { schema } => Ok(schema_match(schema, output)),
        VerificationMethod::DeterministicCheck {
            check_name,
            check_params,
            expected_result,
        } => deterministic_check(check_name, check_params, expected_result.as_ref(), output, registry),
        VerificationMethod::Composite {
            steps,
            mode,
            weights,
            pass_threshold,
        } => composite(steps, mode, weights.as_deref(), *pass_threshold, output, registry),
    }
}

fn schema_match(schema: &Value, output: &Value) -> CheckResult {
    match jsonschema::validator_for(schema) {
        Ok(validator) => {
            if validator.is_valid(output) {
                CheckResult {
                    passed: true,
                    score: Some(1.0),
                    details: None,
                }
            } else {
                let details: Vec<String> = validator.iter_errors(output).map(|e| e.to_string()).collect();
                CheckResult {
                    passed: false,
                    score: Some(0.0),
                    details: Some(details.join("; ")),
                }
            }
        }
        Err(e) => CheckResult {
            passed: false,
            score: Some(0.0),
            details: Some(format!("invalid schema: {e}")),
        },
    }
}

fn deterministic_check(
    check_name: &str,
    check_params: &Value,
    expected_result: Option<&Value>,
    output: &Value,
    registry: &CheckFunctionRegistry,
) -> Result<CheckResult, ContractError> {
    let check = registry
        .get(check_name)
        .ok_or_else(|| ContractError::UnknownCheckFunction(check_name.to_string()))?;
    let result = check(output, check_params);
    if let Some(expected) = expected_result {
        let actual_json = check_result_to_json(&result);
        let matches = match (
            delegation_crypto::canonicalize(&actual_json),
            delegation_crypto::canonicalize(expected),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        return Ok(CheckResult {
            passed: matches,
            score: Some(if matches { 1.0 } else { 0.0 }),
            details: if matches {
                None
            } else {
                Some("deterministic_check: result did not match expectedResult".into())
            },
        });
    }
    Ok(result)
}

fn check_result_to_json(result: &CheckResult) -> Value {
    serde_json::json!({
        "passed": result.passed,
        "score": result.score,
        "details": result.details,
    })
}

fn composite(
    steps: &[VerificationStep],
    mode: &CompositeMode,
    weights: Option<&[f64]>,
    pass_threshold: Option<f64>,
    output: &Value,
    registry: &CheckFunctionRegistry,
) -> Result<CheckResult, ContractError> {
    match mode {
        CompositeMode::AllPass => {
            for step in steps {
                let result = verify_method(&step.method, output, registry)?;
                if !result.passed {
                    return Ok(CheckResult {
                        passed: false,
                        score: Some(0.0),
                        details: result.details,
                    });
                }
            }
            Ok(CheckResult {
                passed: true,
                score: Some(1.0),
                details: None,
            })
        }
        CompositeMode::Majority => {
            let mut pass_count = 0usize;
            for step in steps {
                let result = verify_method(&step.method, output, registry)?;
                if result.passed {
                    pass_count += 1;
                }
            }
            let passed = pass_count > steps.len() / 2;
            Ok(CheckResult {
                passed,
                score: Some(pass_count as f64 / steps.len().max(1) as f64),
                details: None,
            })
        }
        CompositeMode::Weighted => {
            let weights = weights.ok_or(ContractError::WeightsLengthMismatch {
                weights: 0,
                steps: steps.len(),
            })?;
            if weights.len() != steps.len() {
                return Err(ContractError::WeightsLengthMismatch {
                    weights: weights.len(),
                    steps: steps.len(),
                });
            }
            let mut weighted_score = 0.0_f64;
            for (step, weight) in steps.iter().zip(weights) {
                let result = verify_method(&step.method, output, registry)?;
                let step_score = result.score.unwrap_or(if result.passed { 1.0 } else { 0.0 });
                weighted_score += weight * step_score;
            }
            let threshold = pass_threshold.unwrap_or(0.7);
            Ok(CheckResult {
                passed: weighted_score >= threshold,
                score: Some(weighted_score),
                details: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VerificationMethod;
    use serde_json::json;

    fn step(method: VerificationMethod) -> VerificationStep {
        VerificationStep { method }
    }

    #[test]
    fn schema_match_pass_and_fail() {
        let registry = CheckFunctionRegistry::with_builtins();
        let contract_ok = sample_contract(VerificationMethod::SchemaMatch {
            schema: json!({"type": "string"}),
        });
        let result = verify_output(&contract_ok, &json!("hello"), &registry)
            .unwrap()
            .into_result();
        assert!(result.passed);

        let result = verify_output(&contract_ok, &json!(42), &registry)
            .unwrap()
            .into_result();
        assert!(!result.passed);
    }

    #[test]
    fn deterministic_check_unknown_name_fails() {
        let registry = CheckFunctionRegistry::with_builtins();
        let contract = sample_contract(VerificationMethod::DeterministicCheck {
            check_name: "does_not_exist".into(),
            check_params: json!({}),
            expected_result: None,
        });
        let err = verify_output(&contract, &json!("x"), &registry).unwrap_err();
        assert!(matches!(err, ContractError::UnknownCheckFunction(_)));
    }

    #[test]
    fn composite_all_pass_short_circuits() {
        let registry = CheckFunctionRegistry::with_builtins();
        let contract = sample_contract(VerificationMethod::Composite {
            steps: vec![
                step(VerificationMethod::SchemaMatch {
                    schema: json!({"type": "string"}),
                }),
                step(VerificationMethod::DeterministicCheck {
                    check_name: "string_length".into(),
                    check_params: json!({"min": 100}),
                    expected_result: None,
                }),
            ],
            mode: CompositeMode::AllPass,
            weights: None,
            pass_threshold: None,
        });
        let result = verify_output(&contract, &json!("short"), &registry)
            .unwrap()
            .into_result();
        assert!(!result.passed);
    }

    #[test]
    fn composite_majority_passes_when_more_than_half_pass() {
        let registry = CheckFunctionRegistry::with_builtins();
        let contract = sample_contract(VerificationMethod::Composite {
            steps: vec![
                step(VerificationMethod::SchemaMatch {
                    schema: json!({"type": "string"}),
                }),
                step(VerificationMethod::DeterministicCheck {
                    check_name: "string_length".into(),
                    check_params: json!({"min": 1}),
                    expected_result: None,
                }),
                step(VerificationMethod::DeterministicCheck {
                    check_name: "string_length".into(),
                    check_params: json!({"min": 1000}),
                    expected_result: None,
                }),
            ],
            mode: CompositeMode::Majority,
            weights: None,
            pass_threshold: None,
        });
        let result = verify_output(&contract, &json!("hello"), &registry)
            .unwrap()
            .into_result();
        assert!(result.passed);
    }

    #[test]
    fn composite_weighted_requires_matching_lengths() {
        let registry = CheckFunctionRegistry::with_builtins();
        let contract = sample_contract(VerificationMethod::Composite {
            steps: vec![step(VerificationMethod::SchemaMatch {
                schema: json!({"type": "string"}),
            })],
            mode: CompositeMode::Weighted,
            weights: Some(vec![0.5, 0.5]),
            pass_threshold: None,
        });
        let err = verify_output(&contract, &json!("hello"), &registry).unwrap_err();
        assert!(matches!(err, ContractError::WeightsLengthMismatch { .. }));
    }

    #[test]
    fn composite_weighted_uses_threshold() {
        let registry = CheckFunctionRegistry::with_builtins();
        let contract = sample_contract(VerificationMethod::Composite {
            steps: vec![
                step(VerificationMethod::SchemaMatch {
                    schema: json!({"type": "string"}),
                }),
                step(VerificationMethod::DeterministicCheck {
                    check_name: "string_length".into(),
                    check_params: json!({"min": 1000}),
                    expected_result: None,
                }),
            ],
            mode: CompositeMode::Weighted,
            weights: Some(vec![0.8, 0.2]),
            pass_threshold: Some(0.7),
        });
        let result = verify_output(&contract, &json!("hello"), &registry)
            .unwrap()
            .into_result();
        assert!(result.passed);
        assert_eq!(result.score, Some(0.8));
    }

    fn sample_contract(verification: VerificationMethod) -> TaskContract {
        use delegation_core::MicroCents;
        use delegation_crypto::generate_keypair;
        use std::collections::BTreeMap;

        let issuer = generate_keypair(None);
        crate::contract::create_contract(
            &issuer,
            crate::types::TaskSpec {
                title: "t".into(),
                description: "d".into(),
                input: BTreeMap::new(),
                output_schema: None,
            },
            verification,
            crate::types::Constraints {
                max_budget_microcents: 1000 as MicroCents,
                deadline: delegation_core::Timestamp("2030-01-01T00:00:00.000Z".into()),
                max_chain_depth: 5,
                required_capabilities: vec![],
            },
        )
        .unwrap()
    }
}
