//! Top-level facade over the scoped-delegation protocol: the DCT engine
//! (via [`DctBackend`]), the delegation chain store, revocation, the
//! attestation/trust engine, and task contracts, re-exported as one surface
//! so a host application depends on a single crate.
//!
//! This crate does not itself open sockets or schedule gossip rounds — it
//! wires the pieces together and leaves transport to the embedding
//! application. [`circuit_breaker`] is exported for that transport layer's
//! benefit; nothing in this crate's own call paths uses it.

pub mod backend;
pub mod circuit_breaker;

pub use backend::{BackendError, DctBackend};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};

pub use delegation_attestation::{
    create_completion_attestation, create_delegation_verification_attestation,
    verify_attestation_signature, Attestation, AttestationResult, AttestationType,
    VerificationOutcome, ATTESTATION_VERSION,
};
pub use delegation_attestation::{TrustEngine, TrustEngineConfig, TrustOutcome, TrustProfile, TrustScore};
pub use delegation_chain::{ChainError, ChainStore, ChainVerification, Delegation, DelegationStatus};
pub use delegation_contract::{
    output_hash, verify_output, CheckFn, CheckFunctionRegistry, CheckOutcome, CheckResult,
    CompositeMode, Constraints, ContractError, TaskContract, TaskSpec, VerificationMethod,
    VerificationStep, CONTRACT_VERSION,
};
pub use delegation_core::{
    generate_attestation_id, generate_contract_id, generate_delegation_id, is_resource_subset,
    is_subset, match_capability, Capability, CoreError, MicroCents, PrincipalId, PrincipalInfo,
    Timestamp, ROOT_DELEGATION_ID,
};
pub use delegation_crypto::{generate_keypair, Keypair};
pub use delegation_dct::{
    attenuate_dct, create_dct, decode_token, encode_token, inspect_dct, revocation_id_of_attenuation,
    revocation_id_of_authority, verify_dct, AttenuateParams, AuthorizedScope, CreateDctParams,
    DctError, DctToken, DenialReason, EffectiveBounds, RequestedCapability, TokenInspection,
    VerificationContext, DEFAULT_MAX_CHAIN_DEPTH,
};
pub use delegation_revocation::{
    create_revocation_entry, DistributedRevocationConfig, DistributedRevocationStore,
    LocalRevocationStore, RevocationEntry, RevocationError, RevocationPeer, RevocationScope,
    SyncHandle,
};
