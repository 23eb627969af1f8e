//! Task contracts and the unified output-verification dispatcher (§4.9).

pub mod checks;
pub mod contract;
pub mod dispatcher;
pub mod error;
pub mod types;

pub use checks::{output_hash, CheckFn, CheckFunctionRegistry, CheckResult};
pub use contract::{create_contract, verify_contract_signature, CONTRACT_VERSION};
pub use dispatcher::{verify_output, CheckOutcome};
pub use error::ContractError;
pub use types::{
    CompositeMode, Constraints, TaskContract, TaskSpec, VerificationMethod, VerificationStep,
};
