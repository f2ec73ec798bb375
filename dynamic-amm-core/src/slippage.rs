use anchor_lang::prelude::*;
use fix::prelude::*;
use fix::typenum::Z0;

use crate::error::AmmError::ArithmeticOverflow;

/// Lowest acceptable amount for a quoted amount under a slippage tolerance in
/// basis points. Tolerances above 100% clamp to a zero minimum.
///   `min = floor(amount * (1 - bps / 10^4))`
pub fn amount_with_slippage(amount: u64, slippage_bps: u64) -> Result<u64> {
  let tolerance = UFix64::<N4>::new(slippage_bps);
  let one = UFix64::<N4>::one();
  if tolerance >= one {
    return Ok(0);
  }
  one
    .checked_sub(&tolerance)
    .and_then(|factor| {
      UFix64::<Z0>::new(amount).mul_div_floor(factor, UFix64::one())
    })
    .map(|min| min.bits)
    .ok_or(ArithmeticOverflow.into())
}
