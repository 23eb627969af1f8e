use thiserror::Error;

#[derive(Debug, Error)]
pub enum RevocationError {
    #[error("revocation entry signature does not verify against its revokedBy principal")]
    InvalidSignature,

    #[error("revocation id not found: {0}")]
    NotFound(String),

    #[error("peer limit exceeded: max {max}, already have {got}")]
    MaxPeersExceeded { max: usize, got: usize },

    #[error("peer {0} rejected the revocation entry")]
    PeerRejected(String),

    #[error("failed to (de)serialize revocation store snapshot: {0}")]
    Serialization(String),
}
