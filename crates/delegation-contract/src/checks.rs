//! Deterministic check functions (§4.9) and the registry that looks them up
//! by name. The seven built-ins are registered by default; callers may
//! `register` their own, mirroring the teacher's named, caller-extensible
//! registry pattern (see DESIGN.md).

use std::collections::HashMap;
use std::sync::Arc;

use delegation_crypto::{b64url_encode, blake2b256, canonicalize};
use serde_json::Value;

pub type CheckFn = Arc<dyn Fn(&Value, &Value) -> CheckResult + Send + Sync>;

#[derive(Clone, Debug, PartialEq)]
pub struct CheckResult {
    pub passed: bool,
    pub score: Option<f64>,
    pub details: Option<String>,
}

impl CheckResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            score: Some(1.0),
            details: None,
        }
    }

    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            passed: false,
            score: Some(0.0),
            details: Some(details.into()),
        }
    }
}

/// Dot-separated field-path traversal. Missing intermediate steps yield
/// `None` rather than an error — most built-ins treat that as `passed:
/// false` (§4.9).
pub fn get_field<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[derive(Clone)]
pub struct CheckFunctionRegistry {
    functions: HashMap<String, CheckFn>,
}

impl CheckFunctionRegistry {
    /// An empty registry with none of the built-ins — for callers that want
    /// to compose their own check set from scratch.
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// The default registry: the seven built-ins from §4.9.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("regex_match", Arc::new(regex_match));
        registry.register("json_schema", Arc::new(json_schema));
        registry.register("string_length", Arc::new(string_length));
        registry.register("array_length", Arc::new(array_length));
        registry.register("field_exists", Arc::new(field_exists));
        registry.register("exit_code", Arc::new(exit_code));
        registry.register("output_equals", Arc::new(output_equals));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, f: CheckFn) {
        self.functions.insert(name.into(), f);
    }

    pub fn get(&self, name: &str) -> Option<&CheckFn> {
        self.functions.get(name)
    }
}

impl Default for CheckFunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn field_or_whole<'a>(output: &'a Value, params: &Value) -> &'a Value {
    match params.get("field").and_then(Value::as_str) {
        Some(path) => get_field(output, path).unwrap_or(&Value::Null),
        None => output,
    }
}

fn regex_match(output: &Value, params: &Value) -> CheckResult {
    let Some(pattern) = params.get("pattern").and_then(Value::as_str) else {
        return CheckResult::fail("regex_match: missing \"pattern\" param");
    };
    let flags = params.get("flags").and_then(Value::as_str).unwrap_or("");
    let pattern_str = if flags.contains('i') {
        format!("(?i){pattern}")
    } else {
        pattern.to_string()
    };
    let Ok(re) = regex::Regex::new(&pattern_str) else {
        return CheckResult::fail(format!("regex_match: invalid pattern {pattern}"));
    };
    let subject = field_or_whole(output, params);
    let text = subject.as_str().map(str::to_string).unwrap_or_else(|| subject.to_string());
    if re.is_match(&text) {
        CheckResult::pass()
    } else {
        CheckResult::fail(format!("regex_match: {pattern} did not match {text}"))
    }
}

fn json_schema(output: &Value, params: &Value) -> CheckResult {
    let Some(schema) = params.get("schema") else {
        return CheckResult::fail("json_schema: missing \"schema\" param");
    };
    match jsonschema::validator_for(schema) {
        Ok(validator) => {
            if validator.is_valid(output) {
                CheckResult::pass()
            } else {
                let errors: Vec<String> = validator.iter_errors(output).map(|e| e.to_string()).collect();
                CheckResult::fail(errors.join("; "))
            }
        }
        Err(e) => CheckResult::fail(format!("json_schema: invalid schema: {e}")),
    }
}

fn string_length(output: &Value, params: &Value) -> CheckResult {
    let subject = field_or_whole(output, params);
    let Some(s) = subject.as_str() else {
        return CheckResult::fail("string_length: field is not a string");
    };
    let len = s.chars().count();
    let min = params.get("min").and_then(Value::as_u64).map(|n| n as usize);
    let max = params.get("max").and_then(Value::as_u64).map(|n| n as usize);
    if min.is_some_and(|min| len < min) || max.is_some_and(|max| len > max) {
        CheckResult::fail(format!("string_length: length {len} outside [{min:?}, {max:?}]"))
    } else {
        CheckResult::pass()
    }
}

fn array_length(output: &Value, params: &Value) -> CheckResult {
    let subject = field_or_whole(output, params);
    let Some(arr) = subject.as_array() else {
        return CheckResult::fail("array_length: field is not an array");
    };
    let len = arr.len();
    let min = params.get("min").and_then(Value::as_u64).map(|n| n as usize);
    let max = params.get("max").and_then(Value::as_u64).map(|n| n as usize);
    if min.is_some_and(|min| len < min) || max.is_some_and(|max| len > max) {
        CheckResult::fail(format!("array_length: length {len} outside [{min:?}, {max:?}]"))
    } else {
        CheckResult::pass()
    }
}

fn field_exists(output: &Value, params: &Value) -> CheckResult {
    let Some(fields) = params.get("fields").and_then(Value::as_array) else {
        return CheckResult::fail("field_exists: missing \"fields\" param");
    };
    let missing: Vec<String> = fields
        .iter()
        .filter_map(Value::as_str)
        .filter(|path| get_field(output, path).is_none())
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        CheckResult::pass()
    } else {
        CheckResult::fail(format!("field_exists: missing {}", missing.join(", ")))
    }
}

fn exit_code(output: &Value, params: &Value) -> CheckResult {
    let expected = params.get("expected").and_then(Value::as_i64);
    let actual = get_field(output, "exitCode").and_then(Value::as_i64);
    match (expected, actual) {
        (Some(expected), Some(actual)) if expected == actual => CheckResult::pass(),
        (Some(expected), actual) => {
            CheckResult::fail(format!("exit_code: expected {expected}, got {actual:?}"))
        }
        (None, _) => CheckResult::fail("exit_code: missing \"expected\" param"),
    }
}

fn output_equals(output: &Value, params: &Value) -> CheckResult {
    let Some(expected) = params.get("expected") else {
        return CheckResult::fail("output_equals: missing \"expected\" param");
    };
    let matches = match (canonicalize(output), canonicalize(expected)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if matches {
        CheckResult::pass()
    } else {
        CheckResult::fail("output_equals: canonical JSON does not match")
    }
}

/// Canonical-JSON hash of a value, exposed for callers comparing
/// `outputHash` on an attestation result to a recomputed digest.
pub fn output_hash(value: &Value) -> Option<String> {
    canonicalize(value).ok().map(|bytes| b64url_encode(blake2b256(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn regex_match_checks_whole_output_by_default() {
        let registry = CheckFunctionRegistry::with_builtins();
        let f = registry.get("regex_match").unwrap();
        let result = f(&json!("hello world"), &json!({"pattern": "^hello"}));
        assert!(result.passed);
    }

    #[test]
    fn field_exists_reports_missing_fields() {
        let registry = CheckFunctionRegistry::with_builtins();
        let f = registry.get("field_exists").unwrap();
        let result = f(&json!({"a": {"b": 1}}), &json!({"fields": ["a.b", "a.c"]}));
        assert!(!result.passed);
        assert!(result.details.unwrap().contains("a.c"));
    }

    #[test]
    fn string_length_respects_min_and_max() {
        let registry = CheckFunctionRegistry::with_builtins();
        let f = registry.get("string_length").unwrap();
        assert!(f(&json!("hi"), &json!({"min": 1, "max": 5})).passed);
        assert!(!f(&json!("hi"), &json!({"min": 3})).passed);
    }

    #[test]
    fn output_equals_uses_canonical_comparison() {
        let registry = CheckFunctionRegistry::with_builtins();
        let f = registry.get("output_equals").unwrap();
        let result = f(&json!({"b": 1, "a": 2}), &json!({"expected": {"a": 2, "b": 1}}));
        assert!(result.passed);
    }

    #[test]
    fn registry_is_extensible() {
        let mut registry = CheckFunctionRegistry::empty();
        registry.register("always_pass", Arc::new(|_output, _params| CheckResult::pass()));
        assert!(registry.get("always_pass").unwrap()(&json!(null), &json!(null)).passed);
        assert!(registry.get("regex_match").is_none());
    }
}
