//! Two-level glob matching over `namespace:action:resource` capabilities.
//!
//! `resource` patterns split on `/`: a `*` segment matches exactly one path
//! segment, a `**` segment matches zero or more contiguous segments. Matching
//! is total (no error path) — an unparsable pattern simply never matches
//! anything but itself.

use crate::types::Capability;

/// `cap` authorizes `(requested_namespace, requested_action, requested_resource)`
/// iff namespace and action match exactly or via `"*"`, and the resource glob
/// matches.
pub fn match_capability(
    cap: &Capability,
    requested_namespace: &str,
    requested_action: &str,
    requested_resource: &str,
) -> bool {
    (cap.namespace == requested_namespace || cap.namespace == "*")
        && (cap.action == requested_action || cap.action == "*")
        && match_glob(&cap.resource, requested_resource)
}

/// Whole-pattern shortcuts: a bare `"*"` or `"**"` pattern matches any value,
/// including the empty string, without segment-splitting.
pub fn match_glob(pattern: &str, value: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let value_segments: Vec<&str> = value.split('/').collect();
    match_segments(&pattern_segments, &value_segments)
}

/// Recursive segment matcher. `**` enumerates every possible run length it
/// could consume (including zero), which is the straightforward — if not
/// asymptotically fastest — way to implement a double-star glob.
fn match_segments(pattern: &[&str], value: &[&str]) -> bool {
    match pattern.first() {
        None => value.is_empty(),
        Some(&"**") => {
            // "**" may consume 0..=value.len() segments; try each.
            for consumed in 0..=value.len() {
                if match_segments(&pattern[1..], &value[consumed..]) {
                    return true;
                }
            }
            false
        }
        Some(&"*") => {
            if value.is_empty() {
                false
            } else {
                match_segments(&pattern[1..], &value[1..])
            }
        }
        Some(seg) => {
            if value.first() == Some(seg) {
                match_segments(&pattern[1..], &value[1..])
            } else {
                false
            }
        }
    }
}

/// A child capability is a subset of the given parent list iff some parent
/// has the same namespace and action (subject to `"*"` equality) and the
/// child's resource is a resource-subset of the parent's.
///
/// Namespace/action subset checks require exact string equality (or a parent
/// wildcard) — this is deliberately conservative per the spec's "known
/// imprecision" note; it never falsely approves a narrowing.
pub fn is_subset(child: &Capability, parents: &[Capability]) -> bool {
    parents.iter().any(|parent| {
        (parent.namespace == child.namespace || parent.namespace == "*")
            && (parent.action == child.action || parent.action == "*")
            && is_resource_subset(&child.resource, &parent.resource)
    })
}

/// True when every value `child` could match is also matched by `parent`.
///
/// This is a conservative approximation, not full glob-language containment:
/// it recognizes the parent being `"*"`/`"**"`, an exact match, or the
/// `prefix/**` / `prefix/*` shapes. Legitimate narrowings outside these
/// shapes (e.g. `prefix/*/suffix` narrowing `prefix/**`) are rejected rather
/// than risk a false approval.
pub fn is_resource_subset(child: &str, parent: &str) -> bool {
    if parent == "*" || parent == "**" {
        return true;
    }
    if child == parent {
        return true;
    }
    if let Some(prefix) = parent.strip_suffix("/**") {
        return child == prefix || child.starts_with(&format!("{prefix}/"));
    }
    if let Some(prefix) = parent.strip_suffix("/*") {
        if let Some(rest) = child.strip_prefix(&format!("{prefix}/")) {
            return !rest.contains('/');
        }
        return false;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_star_matches_empty_and_multi_segment() {
        assert!(match_glob("src/**", "src"));
        assert!(match_glob("src/**", "src/a/b/c"));
        assert!(match_glob("**", ""));
        assert!(match_glob("**", "anything/at/all"));
    }

    #[test]
    fn single_star_matches_exactly_one_segment() {
        assert!(match_glob("src/*", "src/main.ts"));
        assert!(!match_glob("src/*", "src/a/b"));
        assert!(!match_glob("src/*", "src"));
    }

    #[test]
    fn exact_segments_must_match() {
        assert!(match_glob("src/main.ts", "src/main.ts"));
        assert!(!match_glob("src/main.ts", "src/other.ts"));
    }

    #[test]
    fn match_capability_checks_namespace_and_action_wildcards() {
        let cap = Capability::new("*", "read", "docs/**");
        assert!(match_capability(&cap, "code", "read", "docs/readme.md"));
        assert!(!match_capability(&cap, "code", "write", "docs/readme.md"));
    }

    #[test]
    fn resource_subset_prefix_star_star() {
        assert!(is_resource_subset("src/a/b", "src/**"));
        assert!(is_resource_subset("src", "src/**"));
        assert!(!is_resource_subset("other/a", "src/**"));
    }

    #[test]
    fn resource_subset_prefix_star_rejects_nested() {
        assert!(is_resource_subset("src/main.ts", "src/*"));
        assert!(!is_resource_subset("src/a/b", "src/*"));
    }

    #[test]
    fn resource_subset_known_imprecision_rejects_legitimate_narrowing() {
        // prefix/*/suffix narrowing prefix/** is legitimate but not
        // recognized by this conservative check — documented in spec §9.
        assert!(!is_resource_subset("src/*/suffix", "src/**"));
    }

    #[test]
    fn is_subset_requires_matching_namespace_and_action() {
        let parents = vec![Capability::new("code", "*", "**")];
        let narrower = Capability::new("code", "read", "src/**");
        assert!(is_subset(&narrower, &parents));

        let wrong_ns = Capability::new("docs", "read", "src/**");
        assert!(!is_subset(&wrong_ns, &parents));
    }
}
