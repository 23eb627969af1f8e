//! DCT backend selection (§9 "no dynamic dispatch on the hot path"): the
//! engine picks an encoding once, via this enum, rather than paying for
//! virtual dispatch inside a verification call. `Sjt` is the only backend
//! with a body in this crate; `Biscuit` is reserved for a future
//! Datalog-based encoding and always returns `Unsupported`.

use delegation_dct::{
    attenuate_dct, create_dct, inspect_dct, verify_dct, AttenuateParams, AuthorizedScope,
    CreateDctParams, DenialReason, TokenInspection, VerificationContext,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DctBackend {
    Sjt,
    Biscuit,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend {0:?} is not supported by this build")]
    Unsupported(DctBackend),

    #[error(transparent)]
    Dct(#[from] delegation_dct::DctError),

    #[error(transparent)]
    Denial(#[from] DenialReason),
}

impl DctBackend {
    pub fn create(&self, params: &CreateDctParams) -> Result<String, BackendError> {
        match self {
            DctBackend::Sjt => Ok(create_dct(params)?),
            DctBackend::Biscuit => Err(BackendError::Unsupported(*self)),
        }
    }

    pub fn attenuate(&self, serialized: &str, params: &AttenuateParams) -> Result<String, BackendError> {
        match self {
            DctBackend::Sjt => Ok(attenuate_dct(serialized, params)?),
            DctBackend::Biscuit => Err(BackendError::Unsupported(*self)),
        }
    }

    pub fn verify(
        &self,
        serialized: &str,
        context: &VerificationContext,
    ) -> Result<Result<AuthorizedScope, DenialReason>, BackendError> {
        match self {
            DctBackend::Sjt => Ok(verify_dct(serialized, context)),
            DctBackend::Biscuit => Err(BackendError::Unsupported(*self)),
        }
    }

    pub fn inspect(&self, serialized: &str) -> Result<TokenInspection, BackendError> {
        match self {
            DctBackend::Sjt => Ok(inspect_dct(serialized)?),
            DctBackend::Biscuit => Err(BackendError::Unsupported(*self)),
        }
    }
}
