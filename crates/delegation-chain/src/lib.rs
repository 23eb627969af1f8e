//! The directed delegation graph (§4.7): a store mapping delegation id to
//! record, chain traversal from leaf to root, and structural-integrity
//! verification. Deliberately ignorant of DCT signatures — that is
//! `delegation_dct`'s concern.

pub mod error;
pub mod store;
pub mod types;

pub use error::ChainError;
pub use store::{ChainStore, ChainVerification};
pub use types::{Delegation, DelegationStatus};
