//! Overflow-checked integer kernel shared by the vault resolver and curves.
//!
//! Every product is taken in 256 bits and narrowed after division, so large
//! reserves never overflow an intermediate. Rounding is always explicit: floor
//! for amounts the pool pays out, ceil for amounts a user must supply.

use anchor_lang::prelude::*;
use rust_decimal::Decimal;

use crate::error::AmmError::{
  ArithmeticOverflow, DivisionByZero, ZeroOutput,
};

mod wide {
  uint::construct_uint! {
    pub struct U256(4);
  }
}

pub use wide::U256;

/// Narrows a wide value back to token base units.
pub fn narrow(value: U256) -> Result<u64> {
  if value > U256::from(u64::MAX) {
    Err(ArithmeticOverflow.into())
  } else {
    Ok(value.low_u64())
  }
}

/// `value * numerator / denominator`, rounded down.
pub fn mul_div_floor(
  value: u64,
  numerator: u64,
  denominator: u64,
) -> Result<u64> {
  if denominator == 0 {
    return Err(DivisionByZero.into());
  }
  let product = U256::from(value) * U256::from(numerator);
  narrow(product / U256::from(denominator))
}

/// `value * numerator / denominator`, rounded up.
pub fn mul_div_ceil(
  value: u64,
  numerator: u64,
  denominator: u64,
) -> Result<u64> {
  if denominator == 0 {
    return Err(DivisionByZero.into());
  }
  let product = U256::from(value) * U256::from(numerator);
  let (quotient, remainder) = product.div_mod(U256::from(denominator));
  if remainder.is_zero() {
    narrow(quotient)
  } else {
    quotient
      .checked_add(U256::one())
      .ok_or(ArithmeticOverflow.into())
      .and_then(narrow)
  }
}

/// Ceiling division that also re-derives the divisor from the rounded
/// quotient, matching the token-swap program's constant product step.
///
/// A zero quotient (dividend smaller than divisor) means the trade would
/// drain the pool and is rejected as `ZeroOutput` instead of being rounded
/// up to one.
pub fn ceil_div_pair(dividend: U256, divisor: U256) -> Result<(U256, U256)> {
  if divisor.is_zero() {
    return Err(DivisionByZero.into());
  }
  let (mut quotient, remainder) = dividend.div_mod(divisor);
  if quotient.is_zero() {
    return Err(ZeroOutput.into());
  }
  let mut divisor = divisor;
  if !remainder.is_zero() {
    quotient = quotient.checked_add(U256::one()).ok_or(ArithmeticOverflow)?;
    let (rederived, rem) = dividend.div_mod(quotient);
    divisor = if rem.is_zero() {
      rederived
    } else {
      rederived + U256::one()
    };
  }
  Ok((quotient, divisor))
}

/// Distance between two wide values.
#[must_use]
pub fn abs_diff(a: U256, b: U256) -> U256 {
  if a > b {
    a - b
  } else {
    b - a
  }
}

/// Most fractional digits kept when reporting a ratio.
pub const RATIO_SCALE: u32 = 18;

/// `numerator / denominator` as a decimal for reporting values such as spot
/// price and impact. Keeps as many fractional digits (up to
/// [`RATIO_SCALE`]) as the decimal mantissa allows.
pub fn ratio_to_decimal(numerator: U256, denominator: U256) -> Result<Decimal> {
  if denominator.is_zero() {
    return Err(DivisionByZero.into());
  }
  for scale in (0..=RATIO_SCALE).rev() {
    let Some(scaled) = numerator.checked_mul(U256::exp10(scale as usize))
    else {
      continue;
    };
    let quotient = scaled / denominator;
    if quotient > U256::from(u128::MAX) {
      continue;
    }
    let decimal = i128::try_from(quotient.low_u128())
      .ok()
      .and_then(|v| Decimal::try_from_i128_with_scale(v, scale).ok());
    if let Some(decimal) = decimal {
      return Ok(decimal);
    }
  }
  Err(ArithmeticOverflow.into())
}
