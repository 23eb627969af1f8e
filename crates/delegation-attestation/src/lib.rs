//! Signed outcome attestations and the per-principal trust engine they feed
//! (§4.8).

pub mod attestation;
pub mod trust;
pub mod types;

pub use attestation::{
    create_completion_attestation, create_delegation_verification_attestation,
    verify_attestation_signature, ATTESTATION_VERSION,
};
pub use trust::{TrustEngine, TrustEngineConfig, TrustOutcome, TrustProfile, TrustScore};
pub use types::{Attestation, AttestationResult, AttestationType, VerificationOutcome};
