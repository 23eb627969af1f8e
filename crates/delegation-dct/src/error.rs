use thiserror::Error;

/// Failures from `create_dct`/`attenuate_dct` — caller-triggerable conditions
/// a library must surface, never panic on (§7).
#[derive(Debug, Error)]
pub enum DctError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("attenuator {attenuator} does not match current delegatee {expected}")]
    AttenuatorMismatch {
        attenuator: String,
        expected: String,
    },

    #[error("capability expansion: {0}")]
    CapabilityExpansion(String),

    #[error("budget expansion: requested {requested}, parent allows {parent}")]
    BudgetExpansion { requested: u64, parent: u64 },

    #[error("expiry expansion: requested {requested}, parent allows {parent}")]
    ExpiryExpansion { requested: String, parent: String },

    #[error("chain depth not narrowed: requested {requested}, parent allows {parent}")]
    ChainDepthNotNarrowed { requested: u32, parent: u32 },

    #[error("signing failed: {0}")]
    SigningFailed(String),
}
