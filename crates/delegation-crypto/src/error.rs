use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid private key: expected 32 bytes, got {0}")]
    InvalidKey(usize),

    #[error("invalid message")]
    InvalidMessage,

    #[error("failed to canonicalize value: {0}")]
    Canonicalize(String),

    #[error("invalid base64url encoding: {0}")]
    InvalidEncoding(String),
}
