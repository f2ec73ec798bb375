use anchor_lang::prelude::*;
use rust_decimal::Decimal;

use crate::curve::{price_impact, SwapOutcome};
use crate::error::AmmError::ArithmeticOverflow;
use crate::math::{ceil_div_pair, narrow, ratio_to_decimal, U256};

/// `x * y = k` pool without extra parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstantProduct;

impl ConstantProduct {
  /// Destination tokens paid for `source_amount`.
  ///   `y - ceil(x * y / (x + dx))`
  ///
  /// The new destination reserve is rounded up so the output rounds down.
  pub fn swap_output(
    source_amount: u64,
    swap_source_amount: u64,
    swap_destination_amount: u64,
  ) -> Result<u64> {
    if source_amount == 0 {
      return Ok(0);
    }
    let x = U256::from(swap_source_amount);
    let y = U256::from(swap_destination_amount);
    let invariant = x.checked_mul(y).ok_or(ArithmeticOverflow)?;
    let new_source = x
      .checked_add(U256::from(source_amount))
      .ok_or(ArithmeticOverflow)?;
    let (new_destination, _) = ceil_div_pair(invariant, new_source)?;
    y.checked_sub(new_destination)
      .ok_or(ArithmeticOverflow.into())
      .and_then(narrow)
  }

  pub fn compute_out_amount(
    &self,
    source_amount: u64,
    swap_source_amount: u64,
    swap_destination_amount: u64,
  ) -> Result<SwapOutcome> {
    let out_amount = Self::swap_output(
      source_amount,
      swap_source_amount,
      swap_destination_amount,
    )?;
    let spot = Self::spot_price(swap_source_amount, swap_destination_amount)?;
    let price_impact = price_impact(
      U256::from(source_amount),
      U256::from(out_amount),
      spot,
    )?;
    Ok(SwapOutcome {
      out_amount,
      price_impact,
    })
  }

  /// Destination tokens per source token at the margin, `y / x`.
  pub fn spot_price(
    swap_source_amount: u64,
    swap_destination_amount: u64,
  ) -> Result<Decimal> {
    ratio_to_decimal(
      U256::from(swap_destination_amount),
      U256::from(swap_source_amount),
    )
  }

  /// Geometric mean of the reserves, `sqrt(a * b)`.
  pub fn compute_d(&self, token_a_amount: u64, token_b_amount: u64) -> Result<U256> {
    let product = U256::from(token_a_amount)
      .checked_mul(U256::from(token_b_amount))
      .ok_or(ArithmeticOverflow)?;
    Ok(product.integer_sqrt())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::AmmError;
  use proptest::prelude::*;

  #[test]
  fn thousand_into_one_to_two_pool() -> Result<()> {
    let out = ConstantProduct::swap_output(1_000, 1_000_000, 2_000_000)?;
    assert_eq!(out, 1_998);
    Ok(())
  }

  #[test]
  fn draining_trade_is_zero_output() {
    let out = ConstantProduct::swap_output(1_000, 10, 10);
    assert_eq!(out.err(), Some(AmmError::ZeroOutput.into()));
  }

  #[test]
  fn zero_input() -> Result<()> {
    let outcome =
      ConstantProduct.compute_out_amount(0, 1_000_000, 2_000_000)?;
    assert_eq!(outcome.out_amount, 0);
    assert_eq!(outcome.price_impact, Decimal::ZERO);
    Ok(())
  }

  #[test]
  fn impact_grows_with_size() -> Result<()> {
    let small = ConstantProduct.compute_out_amount(1_000, 1_000_000, 2_000_000)?;
    let large =
      ConstantProduct.compute_out_amount(100_000, 1_000_000, 2_000_000)?;
    assert!(small.price_impact < Decimal::new(2, 3));
    assert!(large.price_impact > Decimal::new(9, 2));
    assert!(large.price_impact > small.price_impact);
    Ok(())
  }

  #[test]
  fn invariant_is_geometric_mean() -> Result<()> {
    let d = ConstantProduct.compute_d(1_000_000, 4_000_000)?;
    assert_eq!(d, U256::from(2_000_000u64));
    let d = ConstantProduct.compute_d(u64::MAX, u64::MAX)?;
    assert_eq!(d, U256::from(u64::MAX));
    Ok(())
  }

  proptest! {
    #[test]
    fn output_bounded_and_monotone(
      x in 1_000_000u64..1_000_000_000_000,
      y in 1_000_000u64..1_000_000_000_000,
      dx in 0u64..100_000_000_000,
      step in 1u64..1_000_000,
    ) {
      let out = ConstantProduct::swap_output(dx, x, y)?;
      let more = ConstantProduct::swap_output(dx + step, x, y)?;
      prop_assert!(out < y);
      prop_assert!(more < y);
      prop_assert!(more >= out);
    }
  }
}
