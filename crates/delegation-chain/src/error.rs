use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("delegation not found: {0}")]
    NotFound(String),

    #[error("invalid status transition: {from:?} is terminal, cannot move to {to:?}")]
    TerminalStatus {
        from: crate::types::DelegationStatus,
        to: crate::types::DelegationStatus,
    },
}
