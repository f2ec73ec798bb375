use anchor_lang::prelude::*;
use fix::prelude::*;
use fix::typenum::Z0;

use crate::error::AmmError::{ArithmeticOverflow, DivisionByZero};
use crate::math::U256;

/// Basis point denominator used by [`PoolFees::from_bps`].
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Trade fee schedule stored on the pool.
///
/// The trade fee is a fraction of the input amount. The protocol fee is a
/// fraction *of the trade fee*, the remainder stays in the pool for LPs.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize,
)]
pub struct PoolFees {
  pub trade_fee_numerator: u64,
  pub trade_fee_denominator: u64,
  pub protocol_trade_fee_numerator: u64,
  pub protocol_trade_fee_denominator: u64,
}

impl PoolFees {
  #[must_use]
  pub fn new(
    trade_fee_numerator: u64,
    trade_fee_denominator: u64,
    protocol_trade_fee_numerator: u64,
    protocol_trade_fee_denominator: u64,
  ) -> PoolFees {
    PoolFees {
      trade_fee_numerator,
      trade_fee_denominator,
      protocol_trade_fee_numerator,
      protocol_trade_fee_denominator,
    }
  }

  /// Fee schedule expressed in basis points, e.g. `25` for 0.25% trade fee
  /// with `2000` (20%) of it going to the protocol.
  #[must_use]
  pub fn from_bps(trade_fee_bps: u64, protocol_share_bps: u64) -> PoolFees {
    PoolFees::new(
      trade_fee_bps,
      BPS_DENOMINATOR,
      protocol_share_bps,
      BPS_DENOMINATOR,
    )
  }

  /// No fees at all, useful for pure curve checks.
  #[must_use]
  pub fn zero() -> PoolFees {
    PoolFees::from_bps(0, 0)
  }

  /// Fee charged on the swap input, floored.
  pub fn trading_fee(&self, amount: u64) -> Result<u64> {
    fraction_floor(
      amount,
      self.trade_fee_numerator,
      self.trade_fee_denominator,
    )
  }

  /// Protocol's share of an already computed trade fee, floored.
  pub fn protocol_trading_fee(&self, trade_fee: u64) -> Result<u64> {
    fraction_floor(
      trade_fee,
      self.protocol_trade_fee_numerator,
      self.protocol_trade_fee_denominator,
    )
  }

  /// Stableswap fee charged on imbalanced liquidity changes:
  ///   `amount * (trade_fee * n / (4 * (n - 1))) / denominator`
  pub fn normalized_trade_fee(&self, n_coins: u8, amount: U256) -> Result<U256> {
    if self.trade_fee_numerator == 0 || amount.is_zero() {
      return Ok(U256::zero());
    }
    if self.trade_fee_denominator == 0 || n_coins < 2 {
      return Err(DivisionByZero.into());
    }
    let n = U256::from(n_coins);
    let adjusted_numerator = U256::from(self.trade_fee_numerator) * n
      / (U256::from(4u8) * (n - U256::one()));
    amount
      .checked_mul(adjusted_numerator)
      .map(|scaled| scaled / U256::from(self.trade_fee_denominator))
      .ok_or(ArithmeticOverflow.into())
  }
}

fn fraction_floor(amount: u64, numerator: u64, denominator: u64) -> Result<u64> {
  if numerator == 0 || amount == 0 {
    return Ok(0);
  }
  if denominator == 0 {
    return Err(DivisionByZero.into());
  }
  UFix64::<Z0>::new(amount)
    .mul_div_floor(
      UFix64::<Z0>::new(numerator),
      UFix64::<Z0>::new(denominator),
    )
    .map(|fee| fee.bits)
    .ok_or(ArithmeticOverflow.into())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::AmmError;

  #[test]
  fn trading_fee_floors() -> Result<()> {
    let fees = PoolFees::from_bps(25, 2_000);
    assert_eq!(fees.trading_fee(1_000_000)?, 2_500);
    assert_eq!(fees.trading_fee(399)?, 0);
    assert_eq!(fees.protocol_trading_fee(2_500)?, 500);
    assert_eq!(fees.protocol_trading_fee(4)?, 0);
    Ok(())
  }

  #[test]
  fn zero_fee_schedule() -> Result<()> {
    let fees = PoolFees::zero();
    assert_eq!(fees.trading_fee(u64::MAX)?, 0);
    assert_eq!(fees.protocol_trading_fee(u64::MAX)?, 0);
    Ok(())
  }

  #[test]
  fn zero_denominator_fails() {
    let fees = PoolFees::new(1, 0, 0, 0);
    assert_eq!(
      fees.trading_fee(100).err(),
      Some(AmmError::DivisionByZero.into())
    );
  }

  #[test]
  fn normalized_fee_halves_for_two_coins() -> Result<()> {
    let fees = PoolFees::new(4, 1_000, 0, 1);
    let fee = fees.normalized_trade_fee(2, U256::from(1_000_000u64))?;
    assert_eq!(fee, U256::from(2_000u64));
    Ok(())
  }
}
