//! Keccak-256 and SHA-256 hashing

use mrx_primitives::H256;
use sha2::Sha256;
use sha3::{Digest, Keccak256};

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_bytes(hasher.finalize().into())
}

/// Compute SHA-256 of the input data
pub fn sha256(data: &[u8]) -> H256 {
    H256::from_bytes(Sha256::digest(data).into())
}

/// SHA-256 applied twice
pub fn sha256d(data: &[u8]) -> H256 {
    sha256(sha256(data).as_bytes())
}

/// First four bytes of `sha256d(data)`, the base58check checksum
pub fn checksum(data: &[u8]) -> [u8; 4] {
    let digest = sha256d(data);
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest.as_bytes()[..4]);
    out
}
