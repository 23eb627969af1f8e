use thiserror::Error;

/// Errors raised by the capability-matcher and shared type helpers.
///
/// These are the only fallible operations in `delegation-core`; the matcher
/// itself (`match_glob`, `match_capability`, `is_subset`) is total and never
/// returns an error.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid principal encoding: {0}")]
    InvalidPrincipal(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
