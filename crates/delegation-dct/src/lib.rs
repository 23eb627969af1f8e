//! The Delegation Capability Token (DCT) engine (§4.3-§4.5): creation,
//! attenuation, and verification of Signed JSON Tokens (SJT v1), plus
//! revocation-id derivation shared with `delegation-revocation`.

pub mod attenuate;
pub mod codec;
pub mod create;
pub mod effective;
pub mod error;
pub mod narrowing;
pub mod revocation_id;
pub mod types;
pub mod verify;

pub use attenuate::{attenuate_dct, AttenuateParams};
pub use codec::{decode_token, encode_token};
pub use create::{create_dct, CreateDctParams};
pub use effective::EffectiveBounds;
pub use error::DctError;
pub use narrowing::NarrowingViolation;
pub use revocation_id::{revocation_id_of_attenuation, revocation_id_of_authority};
pub use types::{AttenuationBlock, AuthorityBlock, Covers, DctToken, SignatureEntry, SJT_FORMAT};
pub use verify::{
    inspect_dct, verify_dct, AuthorizedScope, DenialReason, RequestedCapability, TokenInspection,
    VerificationContext, DEFAULT_MAX_CHAIN_DEPTH,
};
