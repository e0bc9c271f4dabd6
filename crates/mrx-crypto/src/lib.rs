//! # mrx-crypto
//!
//! Hash functions used by the Metrix SDK.
//!
//! - Keccak-256 for ABI selectors, event topics and packed hashes
//! - SHA-256 and double SHA-256 for base58check checksums

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::{checksum, keccak256, sha256, sha256d};
