use crate::error::DomainError;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimals used by ether and by tokens that do not report their own.
pub const ETHER_DECIMALS: u8 = 18;

/// A raw token amount paired with the token's decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn from_decimal(d: Decimal, decimals: u8) -> Result<Self, DomainError> {
        Ok(Self {
            raw: parse_units(d, decimals)?,
            decimals,
        })
    }

    pub fn to_decimal(&self) -> Result<Decimal, DomainError> {
        to_decimal(self.raw, self.decimals)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_units(self.raw, self.decimals))
    }
}

/// Renders a raw amount as a decimal string, without trailing zeros.
///
/// Works on the full 256-bit range; no floating point is involved.
pub fn format_units(raw: U256, decimals: u8) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };

    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    }
}

/// Converts a raw amount to a `Decimal`, failing when it exceeds 96 bits of mantissa.
pub fn to_decimal(raw: U256, decimals: u8) -> Result<Decimal, DomainError> {
    let rendered = format_units(raw, decimals);
    Decimal::from_str(&rendered).map_err(|_| DomainError::NotRepresentable(rendered))
}

/// Converts a human decimal value into raw units (`toWei` for 18 decimals).
pub fn parse_units(value: Decimal, decimals: u8) -> Result<U256, DomainError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::NegativeAmount(value.to_string()));
    }

    let normalized = value.normalize();
    let scale = normalized.scale();
    if scale > decimals as u32 {
        return Err(DomainError::TooPrecise {
            value: value.to_string(),
            decimals,
        });
    }

    let mantissa = U256::from(normalized.mantissa().unsigned_abs());
    let factor = U256::exp10((decimals as u32 - scale) as usize);
    mantissa
        .checked_mul(factor)
        .ok_or_else(|| DomainError::Overflow(value.to_string()))
}

/// Converts a decimal string such as `"1.5"` into raw units.
pub fn parse_units_str(value: &str, decimals: u8) -> Result<U256, DomainError> {
    let d = Decimal::from_str(value.trim())
        .map_err(|_| DomainError::NotRepresentable(value.to_string()))?;
    parse_units(d, decimals)
}
