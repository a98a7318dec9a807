// SPDX-License-Identifier: AGPL-3.0-only
//! Whole-token <-> smallest-unit conversion.
//!
//! All ledger arithmetic happens in smallest units (`u128`, no floating
//! point). Humans type and read whole tokens with an optional fraction:
//! `"100"`, `"0.5"`, `"999900"`.

use crate::UNIT;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitsError {
    #[error("amount is empty")]
    Empty,
    #[error("amount contains a non-digit character: {0:?}")]
    InvalidDigit(String),
    #[error("amount has {got} fractional digits, at most {max} allowed")]
    TooManyDecimals { max: u8, got: usize },
    #[error("amount does not fit in 128 bits")]
    Overflow,
}

/// `whole * 10^18`, `None` if the result does not fit in `u128`.
pub fn to_base_units(whole: u128) -> Option<u128> {
    whole.checked_mul(UNIT)
}

/// Parse a decimal digit run with overflow checks. Empty input is zero.
fn parse_digits(digits: &str, original: &str) -> Result<u128, UnitsError> {
    let mut result: u128 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            return Err(UnitsError::InvalidDigit(original.to_string()));
        }
        result = result
            .checked_mul(10)
            .and_then(|r| r.checked_add((b - b'0') as u128))
            .ok_or(UnitsError::Overflow)?;
    }
    Ok(result)
}

/// Parse a human amount (`"1.5"`) into smallest units at `decimals` places.
pub fn parse_units(input: &str, decimals: u8) -> Result<u128, UnitsError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(UnitsError::Empty);
    }
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(UnitsError::Empty);
    }
    if frac_part.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals {
            max: decimals,
            got: frac_part.len(),
        });
    }

    let scale = 10u128
        .checked_pow(decimals as u32)
        .ok_or(UnitsError::Overflow)?;
    let int_val = parse_digits(int_part, input)?;
    let frac_val = parse_digits(frac_part, input)?;
    let frac_scale = 10u128.pow((decimals as usize - frac_part.len()) as u32);

    int_val
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_val * frac_scale))
        .ok_or(UnitsError::Overflow)
}

/// Render smallest units as a whole-token string, trailing zeros trimmed.
pub fn format_units(value: u128, decimals: u8) -> String {
    let digits = value.to_string();
    let d = decimals as usize;
    if d == 0 {
        return digits;
    }
    let padded = if digits.len() <= d {
        format!("{}{}", "0".repeat(d + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - d);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}
