//! Decimal amounts and their integer base-unit form.
//!
//! Amounts are parsed as arbitrary-precision decimals and scaled by
//! `10^decimals`, rounding half up to an integer. No floating point is used.

use alloy::primitives::U256;
use bigdecimal::{BigDecimal, RoundingMode};
use num::{BigInt, BigUint, One, Signed, Zero};
use std::str::FromStr;

use crate::error::{TransferError, TransferResult};

/// Decimals of the Gwei unit relative to wei.
pub const GWEI_DECIMALS: u8 = 9;

/// Decimal digits of `U256::MAX`.
const U256_DIGITS: i128 = 78;

/// A human-entered amount paired with the token's decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountSpec {
    pub amount: BigDecimal,
    pub decimals: u8,
}

impl AmountSpec {
    pub fn new(amount: BigDecimal, decimals: u8) -> Self {
        Self { amount, decimals }
    }

    /// `round(amount * 10^decimals)` as a 256-bit integer.
    pub fn to_base_units(&self) -> TransferResult<U256> {
        to_base_units(&self.amount, self.decimals).ok_or_else(|| {
            TransferError::InvalidAmount(format!(
                "{} with {} decimals is not representable in 256 bits",
                self.amount, self.decimals
            ))
        })
    }
}

/// Parse a non-negative decimal token amount.
pub fn parse_amount(input: &str) -> TransferResult<BigDecimal> {
    parse_non_negative(input).map_err(TransferError::InvalidAmount)
}

/// Parse a gas price in Gwei and convert it to wei.
pub fn parse_gwei(input: &str) -> TransferResult<U256> {
    let gwei = parse_non_negative(input).map_err(TransferError::InvalidGasParameters)?;
    to_base_units(&gwei, GWEI_DECIMALS).ok_or_else(|| {
        TransferError::InvalidGasParameters(format!("gas price {gwei} Gwei overflows 256 bits"))
    })
}

/// Parse a gas limit.
pub fn parse_gas_limit(input: &str) -> TransferResult<u64> {
    let limit: u64 = input.trim().parse().map_err(|e| {
        TransferError::InvalidGasParameters(format!("gas limit '{}': {}", input.trim(), e))
    })?;
    if limit == 0 {
        return Err(TransferError::InvalidGasParameters(
            "gas limit must be greater than zero".to_string(),
        ));
    }
    Ok(limit)
}

/// Express a wei amount in Gwei.
///
/// Render it with `to_plain_string`; `Display` switches to exponent form
/// for sub-Gwei and round values.
pub fn wei_to_gwei(wei: U256) -> BigDecimal {
    let digits = BigUint::from_bytes_be(&wei.to_be_bytes::<32>());
    BigDecimal::new(BigInt::from(digits), i64::from(GWEI_DECIMALS)).normalized()
}

/// Scale `amount` by `10^decimals`, rounding half up.
///
/// Returns `None` for negative amounts or results wider than 256 bits.
pub fn to_base_units(amount: &BigDecimal, decimals: u8) -> Option<U256> {
    if amount.is_negative() {
        return None;
    }
    if amount.is_zero() {
        return Some(U256::ZERO);
    }

    // scaled < 10^magnitude, so the bound is known before any big-integer work
    let magnitude = integer_digits(amount) + i128::from(decimals);
    if magnitude > U256_DIGITS {
        return None;
    }
    if magnitude < 0 {
        // below 0.1 base units
        return Some(U256::ZERO);
    }

    let scaled = amount * BigDecimal::new(BigInt::one(), -i64::from(decimals));
    let (int, _) = scaled
        .with_scale_round(0, RoundingMode::HalfUp)
        .into_bigint_and_exponent();

    biguint_to_u256(&int.to_biguint()?)
}

/// Digits left of the decimal point (negative for values below 0.1).
fn integer_digits(value: &BigDecimal) -> i128 {
    let (_, scale) = value.as_bigint_and_exponent();
    i128::from(value.digits()) - i128::from(scale)
}

fn biguint_to_u256(value: &BigUint) -> Option<U256> {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return None;
    }
    U256::try_from_be_slice(&bytes)
}

fn parse_non_negative(input: &str) -> Result<BigDecimal, String> {
    let trimmed = input.trim();
    let value = BigDecimal::from_str(trimmed)
        .map_err(|e| format!("'{trimmed}' is not a decimal number: {e}"))?;
    if value.is_negative() {
        return Err(format!("'{trimmed}' is negative"));
    }
    if value.is_zero() {
        return Ok(BigDecimal::zero());
    }
    if integer_digits(&value) > U256_DIGITS {
        return Err(format!("'{trimmed}' is too large for a 256-bit amount"));
    }
    Ok(value)
}
