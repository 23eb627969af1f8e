pub mod canonical;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod keypair;
pub mod signing;

pub use canonical::canonicalize;
pub use encoding::{b64url_decode, b64url_encode};
pub use error::CryptoError;
pub use hash::blake2b256;
pub use keypair::{generate_keypair, Keypair};
pub use signing::{sign, sign_object, verify, verify_object_signature};
