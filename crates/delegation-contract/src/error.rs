use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("unknown check function: {0}")]
    UnknownCheckFunction(String),

    #[error("composite verification requires weights.len() == steps.len(); got {weights} weights for {steps} steps")]
    WeightsLengthMismatch { weights: usize, steps: usize },
}
