pub mod distributed;
pub mod entry;
pub mod error;
pub mod local;

pub use distributed::{
    DistributedRevocationConfig, DistributedRevocationStore, RevocationPeer, SyncHandle,
};
pub use entry::{create_revocation_entry, RevocationEntry, RevocationScope};
pub use error::RevocationError;
pub use local::LocalRevocationStore;
