pub mod capability;
pub mod error;
pub mod ids;
pub mod types;

pub use capability::{is_resource_subset, is_subset, match_capability, match_glob};
pub use error::CoreError;
pub use ids::{generate_attestation_id, generate_contract_id, generate_delegation_id, ROOT_DELEGATION_ID};
pub use types::{Capability, MicroCents, PrincipalId, PrincipalInfo, Timestamp};
