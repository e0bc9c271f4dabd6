//! Address, amount and hash helpers

pub mod address;
pub mod hash;
pub mod number;

pub use address::{
    from_hex_address, is_ethereum_address, is_hex_address, is_metrix_address, parse_any_address,
    to_base58, to_hex_address,
};
pub use hash::{permission_slip, token_info};
pub use number::{decimal_to_scaled, scaled_to_decimal, Amount, MRX_DECIMALS};
