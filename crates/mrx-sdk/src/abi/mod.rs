//! Solidity ABI encoding and decoding
//!
//! Contract tables are built from human-readable fragments
//! (`"function ownerOf(uint256 tokenId) view returns (address)"`) or from a
//! JSON ABI through `alloy-json-abi`, and values are encoded and decoded with
//! `alloy-dyn-abi`. Callers work with [`Token`], which carries the SDK's own
//! address and integer types.

mod codec;
mod table;
mod types;

pub use alloy_dyn_abi::{DynSolType as ParamType, DynSolValue};
pub use alloy_json_abi::{Error as ErrorFragment, Event, Function, Param, StateMutability};
pub use alloy_primitives::I256;
pub use codec::{decode, encode_packed, encode_params, function_selector};
pub use table::{Abi, DecodedEvent, DecodedParam};
pub use types::Token;
