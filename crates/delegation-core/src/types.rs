//! Shared data types for the delegation protocol core.
//!
//! `PrincipalId` is the base64url encoding of an Ed25519 public key; the
//! encoding/decoding and signing machinery live in `delegation-crypto`, this
//! crate only defines the identity's shape so every other crate can depend on
//! it without pulling in cryptography.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A principal identity: base64url(Ed25519 public key), no padding.
///
/// 32 raw bytes encode to exactly 43 base64url characters. This type does not
/// validate that invariant on construction — `delegation-crypto::Keypair`
/// is the only place principal ids are minted from real key material, and
/// callers deserializing tokens are expected to treat an unexpected length as
/// a verification failure rather than a constructor panic.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub String);

impl PrincipalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.0;
        if s.len() > 10 {
            write!(f, "PrincipalId({}…)", &s[..10])
        } else {
            write!(f, "PrincipalId({s})")
        }
    }
}

impl From<String> for PrincipalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PrincipalId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Optional display metadata attached to a principal. Never signed over or
/// consulted by verification — purely informational.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrincipalInfo {
    pub id: PrincipalId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl PrincipalInfo {
    pub fn new(id: PrincipalId) -> Self {
        Self {
            id,
            display_name: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// An ISO-8601 timestamp, `Z`-normalized, compared lexicographically per the
/// protocol's time model (§5 / DESIGN.md). Callers on the verification
/// boundary are responsible for supplying UTC timestamps of identical
/// fractional-second precision; this type performs no clock reads of its own
/// except via `Timestamp::now`, a convenience for demos and tests.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub String);

impl Timestamp {
    pub fn now() -> Self {
        Self(
            chrono::Utc::now()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Add a duration (milliseconds) to this timestamp. Used by tests and
    /// demos to derive expiries; parses via chrono and re-serializes in the
    /// same normalized form as `now`.
    pub fn plus_millis(&self, millis: i64) -> Option<Self> {
        let parsed = chrono::DateTime::parse_from_rfc3339(&self.0).ok()?;
        let shifted = parsed + chrono::Duration::milliseconds(millis);
        Some(Self(
            shifted
                .with_timezone(&chrono::Utc)
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        ))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// Budget amounts. Micro-cents (1/1_000_000 of a display-currency cent),
/// always non-negative by construction since the field is unsigned.
pub type MicroCents = u64;

/// Triple `(namespace, action, resource)`. Namespace and action may be the
/// literal string `"*"`, meaning "any". Resource is a glob pattern — see
/// `crate::capability`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub namespace: String,
    pub action: String,
    pub resource: String,
}

impl Capability {
    pub fn new(namespace: impl Into<String>, action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            action: action.into(),
            resource: resource.into(),
        }
    }
}
