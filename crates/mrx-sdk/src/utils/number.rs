//! Conversion between smallest-unit integer strings and decimal strings

use crate::SdkError;

/// Decimal places of MRX
pub const MRX_DECIMALS: usize = 8;

/// An amount in whole coins
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    /// Decimal string such as `"0.5"` or `"30000000000"`
    Decimal(String),
    /// Floating point value
    Float(f64),
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        Amount::Decimal(s.to_string())
    }
}

impl From<String> for Amount {
    fn from(s: String) -> Self {
        Amount::Decimal(s)
    }
}

impl From<f64> for Amount {
    fn from(f: f64) -> Self {
        Amount::Float(f)
    }
}

/// Render a smallest-unit integer string with `precision` decimals.
///
/// Purely positional: `("1", 8)` gives `"0.00000001"`. Anything but ASCII
/// digits is rejected with [`SdkError::InvalidAmount`].
pub fn scaled_to_decimal(int_string: &str, precision: usize) -> Result<String, SdkError> {
    if !int_string.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SdkError::InvalidAmount(int_string.to_string()));
    }
    let len = int_string.len();
    if precision == 0 {
        return Ok(if len == 0 { "0".to_string() } else { int_string.to_string() });
    }
    Ok(if len > precision {
        let (integers, decimals) = int_string.split_at(len - precision);
        format!("{}.{}", integers, decimals)
    } else {
        format!("0.{:0>width$}", int_string, width = precision)
    })
}

/// Convert a whole-coin amount to a smallest-unit integer string at
/// [`MRX_DECIMALS`] precision.
///
/// Extra fractional digits are truncated. Zero becomes `"0"`.
pub fn decimal_to_scaled(amount: impl Into<Amount>) -> Result<String, SdkError> {
    let text = match amount.into() {
        Amount::Decimal(s) => s.trim().to_string(),
        Amount::Float(f) => {
            if !f.is_finite() {
                return Err(SdkError::InvalidAmount(f.to_string()));
            }
            // -0.0 formats with a sign
            let f = if f == 0.0 { 0.0 } else { f };
            format!("{:.*}", MRX_DECIMALS, f)
        }
    };

    let (integers, decimals) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let empty = integers.is_empty() && decimals.is_empty();
    if empty || !all_digits(integers) || !all_digits(decimals) {
        return Err(SdkError::InvalidAmount(text));
    }

    let mut fraction: String = decimals.chars().take(MRX_DECIMALS).collect();
    while fraction.len() < MRX_DECIMALS {
        fraction.push('0');
    }

    let scaled = format!("{}{}", integers, fraction);
    let trimmed = scaled.trim_start_matches('0');
    Ok(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
}
