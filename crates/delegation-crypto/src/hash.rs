use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// BLAKE2b with a 256-bit digest.
pub fn blake2b256(bytes: impl AsRef<[u8]>) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(bytes.as_ref());
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
