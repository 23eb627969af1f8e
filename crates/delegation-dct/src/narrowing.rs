//! Monotonic-narrowing validation (§4.4 step 4), shared between
//! attenuation-time construction and verification-time re-validation of the
//! whole chain.

use delegation_core::{is_subset, Capability, MicroCents, Timestamp};

use crate::effective::EffectiveBounds;

#[derive(Debug, Clone, PartialEq)]
pub enum NarrowingViolation {
    CapabilityExpansion(String),
    BudgetExpansion { requested: MicroCents, parent: MicroCents },
    ExpiryExpansion { requested: String, parent: String },
    ChainDepthNotNarrowed { requested: u32, parent: u32 },
}

impl std::fmt::Display for NarrowingViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NarrowingViolation::CapabilityExpansion(detail) => {
                write!(f, "capability expansion: {detail}")
            }
            NarrowingViolation::BudgetExpansion { requested, parent } => write!(
                f,
                "budget expansion: requested {requested}, parent allows {parent}"
            ),
            NarrowingViolation::ExpiryExpansion { requested, parent } => write!(
                f,
                "expiry expansion: requested {requested}, parent allows {parent}"
            ),
            NarrowingViolation::ChainDepthNotNarrowed { requested, parent } => write!(
                f,
                "chain depth not narrowed: requested {requested}, parent allows {parent}"
            ),
        }
    }
}

/// Checks that each present override narrows (never expands) relative to
/// `parent`. Absent fields are trivially fine — they inherit.
pub fn check_narrowing(
    parent: &EffectiveBounds,
    new_capabilities: Option<&[Capability]>,
    new_budget: Option<MicroCents>,
    new_expiry: Option<&Timestamp>,
    new_max_chain_depth: Option<u32>,
) -> Result<(), NarrowingViolation> {
    if let Some(caps) = new_capabilities {
        for cap in caps {
            if !is_subset(cap, &parent.capabilities) {
                return Err(NarrowingViolation::CapabilityExpansion(format!(
                    "{}:{}:{} is not a subset of the parent's granted capabilities",
                    cap.namespace, cap.action, cap.resource
                )));
            }
        }
    }
    if let Some(budget) = new_budget {
        if budget > parent.budget {
            return Err(NarrowingViolation::BudgetExpansion {
                requested: budget,
                parent: parent.budget,
            });
        }
    }
    if let Some(expiry) = new_expiry {
        if expiry.as_str() > parent.expiry.as_str() {
            return Err(NarrowingViolation::ExpiryExpansion {
                requested: expiry.as_str().to_string(),
                parent: parent.expiry.as_str().to_string(),
            });
        }
    }
    if let Some(max_depth) = new_max_chain_depth {
        if max_depth >= parent.max_chain_depth {
            return Err(NarrowingViolation::ChainDepthNotNarrowed {
                requested: max_depth,
                parent: parent.max_chain_depth,
            });
        }
    }
    Ok(())
}
