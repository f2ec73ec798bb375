//! Two-coin stableswap invariant with optional staking-token peg.
//!
//! Amounts enter the invariant upscaled to a common precision:
//! - token A by its decimal multiplier, and by [`PRECISION`] when depegged
//! - token B by its decimal multiplier, and by the virtual price when depegged
//!
//! so one upscaled unit of either token carries the same value. Results are
//! downscaled back into base units with floor rounding.

use anchor_lang::prelude::*;
use rust_decimal::Decimal;

use crate::curve::{price_impact, SwapOutcome};
use crate::depeg::PRECISION;
use crate::error::AmmError::{
  ArithmeticOverflow, ConvergenceFailure, DivisionByZero, EmptyPool,
};
use crate::fees::PoolFees;
use crate::math::{abs_diff, narrow, ratio_to_decimal, U256};
use crate::pool::{TokenMultiplier, TokenSide, TradeDirection};

pub const N_COINS: u8 = 2;

/// Newton iteration bound for both `D` and `y`.
pub const MAX_ITERATIONS: u16 = 256;

fn checked(value: Option<U256>) -> Result<U256> {
  value.ok_or(ArithmeticOverflow.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableSwap {
  pub amp: u64,
  pub token_multiplier: TokenMultiplier,
  /// Resolved value of token B in token A, `None` for pegged pools.
  pub virtual_price: Option<u64>,
}

impl StableSwap {
  #[must_use]
  pub fn new(
    amp: u64,
    token_multiplier: TokenMultiplier,
    virtual_price: Option<u64>,
  ) -> StableSwap {
    StableSwap {
      amp,
      token_multiplier,
      virtual_price,
    }
  }

  fn ann(&self) -> U256 {
    U256::from(self.amp) * U256::from(N_COINS)
  }

  fn scale_factor(&self, side: TokenSide) -> Result<U256> {
    let (multiplier, peg) = match side {
      TokenSide::A => (
        self.token_multiplier.token_a_multiplier,
        self.virtual_price.map(|_| PRECISION),
      ),
      TokenSide::B => {
        (self.token_multiplier.token_b_multiplier, self.virtual_price)
      }
    };
    let factor = U256::from(multiplier) * U256::from(peg.unwrap_or(1));
    if factor.is_zero() {
      Err(DivisionByZero.into())
    } else {
      Ok(factor)
    }
  }

  pub fn upscale(&self, side: TokenSide, amount: u64) -> Result<U256> {
    checked(U256::from(amount).checked_mul(self.scale_factor(side)?))
  }

  pub fn downscale(&self, side: TokenSide, amount: U256) -> Result<u64> {
    narrow(amount / self.scale_factor(side)?)
  }

  /// Invariant `D` over upscaled balances.
  pub fn compute_d(&self, amount_a: U256, amount_b: U256) -> Result<U256> {
    self.compute_d_bounded(amount_a, amount_b, MAX_ITERATIONS)
  }

  fn compute_d_bounded(
    &self,
    amount_a: U256,
    amount_b: U256,
    max_iterations: u16,
  ) -> Result<U256> {
    let sum = checked(amount_a.checked_add(amount_b))?;
    if sum.is_zero() {
      return Ok(U256::zero());
    }
    if amount_a.is_zero() || amount_b.is_zero() {
      return Err(EmptyPool.into());
    }
    let n = U256::from(N_COINS);
    let ann = self.ann();
    let ann_less_one = checked(ann.checked_sub(U256::one()))?;
    let mut d = sum;
    for _ in 0..max_iterations {
      let d_prod = checked(d.checked_mul(d))? / (amount_a * n);
      let d_prod = checked(d_prod.checked_mul(d))? / (amount_b * n);
      let previous = d;
      let numerator = checked(
        ann
          .checked_mul(sum)
          .and_then(|v| v.checked_add(d_prod * n))
          .and_then(|v| v.checked_mul(d)),
      )?;
      let denominator = checked(
        ann_less_one
          .checked_mul(d)
          .and_then(|v| v.checked_add(d_prod * (n + U256::one()))),
      )?;
      if denominator.is_zero() {
        return Err(DivisionByZero.into());
      }
      d = numerator / denominator;
      if abs_diff(d, previous) <= U256::one() {
        return Ok(d);
      }
    }
    Err(ConvergenceFailure.into())
  }

  /// Balance of the other token that keeps `D` given one upscaled balance.
  pub fn compute_y(&self, x: U256, d: U256) -> Result<U256> {
    if x.is_zero() {
      return Err(EmptyPool.into());
    }
    let n = U256::from(N_COINS);
    let ann = self.ann();
    if ann.is_zero() {
      return Err(DivisionByZero.into());
    }
    let c = checked(d.checked_mul(d))? / (x * n);
    let c = checked(c.checked_mul(d))? / (ann * n);
    let b = checked((d / ann).checked_add(x))?;
    let mut y = d;
    for _ in 0..MAX_ITERATIONS {
      let previous = y;
      let numerator = checked(y.checked_mul(y).and_then(|v| v.checked_add(c)))?;
      let denominator = checked(
        (y * U256::from(2u8))
          .checked_add(b)
          .and_then(|v| v.checked_sub(d)),
      )?;
      if denominator.is_zero() {
        return Err(DivisionByZero.into());
      }
      y = numerator / denominator;
      if abs_diff(y, previous) <= U256::one() {
        return Ok(y);
      }
    }
    Err(ConvergenceFailure.into())
  }

  /// Invariant over token base units.
  pub fn invariant(&self, token_a_amount: u64, token_b_amount: u64) -> Result<U256> {
    self.compute_d(
      self.upscale(TokenSide::A, token_a_amount)?,
      self.upscale(TokenSide::B, token_b_amount)?,
    )
  }

  /// Invariant expressed in token A base units.
  pub fn invariant_in_token_a(
    &self,
    token_a_amount: u64,
    token_b_amount: u64,
  ) -> Result<u64> {
    let d = self.invariant(token_a_amount, token_b_amount)?;
    self.downscale(TokenSide::A, d)
  }

  /// Marginal destination per source rate at upscaled balances `x`, `y`.
  ///   `(8 A u²v² + v) / (8 A u²v² + u)` with `u = x / D`, `v = y / D`
  pub fn spot_price(&self, x: U256, y: U256, d: U256) -> Result<Decimal> {
    let u = ratio_to_decimal(x, d)?;
    let v = ratio_to_decimal(y, d)?;
    let weight = Decimal::from(self.amp)
      .checked_mul(Decimal::from(8u8))
      .and_then(|w| w.checked_mul(u * u))
      .and_then(|w| w.checked_mul(v * v))
      .ok_or(ArithmeticOverflow)?;
    let numerator = weight.checked_add(v).ok_or(ArithmeticOverflow)?;
    let denominator = weight.checked_add(u).ok_or(ArithmeticOverflow)?;
    numerator
      .checked_div(denominator)
      .ok_or(DivisionByZero.into())
  }

  /// [`Self::spot_price`] over token base units for a trade in
  /// `trade_direction`.
  pub fn spot_price_for(
    &self,
    swap_source_amount: u64,
    swap_destination_amount: u64,
    trade_direction: TradeDirection,
  ) -> Result<Decimal> {
    let (source, destination) = Self::sides(trade_direction);
    let x = self.upscale(source, swap_source_amount)?;
    let y = self.upscale(destination, swap_destination_amount)?;
    let d = self.compute_d(x, y)?;
    self.spot_price(x, y, d)
  }

  fn sides(trade_direction: TradeDirection) -> (TokenSide, TokenSide) {
    match trade_direction {
      TradeDirection::AToB => (TokenSide::A, TokenSide::B),
      TradeDirection::BToA => (TokenSide::B, TokenSide::A),
    }
  }

  pub fn compute_out_amount(
    &self,
    source_amount: u64,
    swap_source_amount: u64,
    swap_destination_amount: u64,
    trade_direction: TradeDirection,
  ) -> Result<SwapOutcome> {
    if source_amount == 0 {
      return Ok(SwapOutcome::zero());
    }
    let (source, destination) = Self::sides(trade_direction);
    let x = self.upscale(source, swap_source_amount)?;
    let y = self.upscale(destination, swap_destination_amount)?;
    let dx = self.upscale(source, source_amount)?;
    let d = self.compute_d(x, y)?;
    let new_y = self.compute_y(checked(x.checked_add(dx))?, d)?;
    let dy = y.saturating_sub(new_y).saturating_sub(U256::one());
    let out_amount = self.downscale(destination, dy)?;
    let price_impact = price_impact(dx, dy, self.spot_price(x, y, d)?)?;
    Ok(SwapOutcome {
      out_amount,
      price_impact,
    })
  }

  /// Pool tokens minted for an arbitrary two-sided deposit.
  ///
  /// Balances that move away from the pool's ratio pay the normalized trade
  /// fee on their distance from the ideal balance before the final invariant
  /// is taken.
  #[allow(clippy::too_many_arguments)]
  pub fn compute_mint_amount_for_deposit(
    &self,
    deposit_a: u64,
    deposit_b: u64,
    swap_a: u64,
    swap_b: u64,
    pool_token_supply: u64,
    fees: &PoolFees,
  ) -> Result<u64> {
    let old_a = self.upscale(TokenSide::A, swap_a)?;
    let old_b = self.upscale(TokenSide::B, swap_b)?;
    let d0 = self.compute_d(old_a, old_b)?;
    if d0.is_zero() {
      return Err(EmptyPool.into());
    }
    let new_a = checked(old_a.checked_add(self.upscale(TokenSide::A, deposit_a)?))?;
    let new_b = checked(old_b.checked_add(self.upscale(TokenSide::B, deposit_b)?))?;
    let d1 = self.compute_d(new_a, new_b)?;
    if d1 <= d0 {
      return Ok(0);
    }
    let charge = |old: U256, new: U256| -> Result<U256> {
      let ideal = checked(d1.checked_mul(old))? / d0;
      let fee = fees.normalized_trade_fee(N_COINS, abs_diff(ideal, new))?;
      checked(new.checked_sub(fee))
    };
    let d2 = self.compute_d(charge(old_a, new_a)?, charge(old_b, new_b)?)?;
    let minted = checked(
      U256::from(pool_token_supply).checked_mul(d2.saturating_sub(d0)),
    )? / d0;
    narrow(minted)
  }

  /// Tokens of `side` paid for burning `pool_token_amount` into one side.
  pub fn compute_withdraw_one(
    &self,
    pool_token_amount: u64,
    pool_token_supply: u64,
    swap_a: u64,
    swap_b: u64,
    fees: &PoolFees,
    side: TokenSide,
  ) -> Result<u64> {
    if pool_token_supply == 0 {
      return Err(DivisionByZero.into());
    }
    let a = self.upscale(TokenSide::A, swap_a)?;
    let b = self.upscale(TokenSide::B, swap_b)?;
    let (base, quote) = match side {
      TokenSide::A => (a, b),
      TokenSide::B => (b, a),
    };
    let d0 = self.compute_d(a, b)?;
    let burned_d =
      checked(U256::from(pool_token_amount).checked_mul(d0))?
        / U256::from(pool_token_supply);
    let d1 = checked(d0.checked_sub(burned_d))?;
    let new_y = self.compute_y(quote, d1)?;

    let expected_base =
      (checked(base.checked_mul(d1))? / d0).saturating_sub(new_y);
    let expected_quote =
      quote.saturating_sub(checked(quote.checked_mul(d1))? / d0);
    let new_base = checked(
      base.checked_sub(fees.normalized_trade_fee(N_COINS, expected_base)?),
    )?;
    let new_quote = checked(
      quote.checked_sub(fees.normalized_trade_fee(N_COINS, expected_quote)?),
    )?;

    let dy = new_base.saturating_sub(self.compute_y(new_quote, d1)?);
    self.downscale(side, dy)
  }
}
