//! Pricing curves selected by a pool's [`CurveType`].

pub mod constant_product;
pub mod stable_swap;

use anchor_lang::prelude::*;
use rust_decimal::Decimal;

pub use constant_product::ConstantProduct;
pub use stable_swap::StableSwap;

use crate::depeg::DepegAccounts;
use crate::error::AmmError::{ArithmeticOverflow, UnsupportedOperation};
use crate::fees::PoolFees;
use crate::math::{ratio_to_decimal, U256};
use crate::pool::{CurveType, TokenSide, TradeDirection};

/// Curve output for a single swap step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
  pub out_amount: u64,
  pub price_impact: Decimal,
}

impl SwapOutcome {
  #[must_use]
  pub fn zero() -> SwapOutcome {
    SwapOutcome {
      out_amount: 0,
      price_impact: Decimal::ZERO,
    }
  }
}

/// Relative shortfall of the realized rate `output / input` against `spot`.
/// Clamped at zero.
pub fn price_impact(input: U256, output: U256, spot: Decimal) -> Result<Decimal> {
  if input.is_zero() || spot.is_zero() {
    return Ok(Decimal::ZERO);
  }
  let realized = ratio_to_decimal(output, input)?;
  let impact = spot
    .checked_sub(realized)
    .and_then(|shortfall| shortfall.checked_div(spot))
    .ok_or(ArithmeticOverflow)?;
  Ok(impact.max(Decimal::ZERO))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapCurve {
  ConstantProduct(ConstantProduct),
  Stable(StableSwap),
}

impl SwapCurve {
  /// Builds the pool's curve, resolving the depeg virtual price for
  /// stableswap pools at `current_time`.
  pub fn load(
    curve_type: &CurveType,
    stake: &Pubkey,
    depeg_accounts: &DepegAccounts,
    current_time: u64,
  ) -> Result<SwapCurve> {
    match curve_type {
      CurveType::ConstantProduct => {
        Ok(SwapCurve::ConstantProduct(ConstantProduct))
      }
      CurveType::Stable {
        amp,
        token_multiplier,
        depeg,
      } => {
        let virtual_price =
          depeg.virtual_price(stake, depeg_accounts, current_time)?;
        Ok(SwapCurve::Stable(StableSwap::new(
          *amp,
          *token_multiplier,
          virtual_price,
        )))
      }
    }
  }

  pub fn compute_out_amount(
    &self,
    source_amount: u64,
    swap_source_amount: u64,
    swap_destination_amount: u64,
    trade_direction: TradeDirection,
  ) -> Result<SwapOutcome> {
    match self {
      SwapCurve::ConstantProduct(curve) => curve.compute_out_amount(
        source_amount,
        swap_source_amount,
        swap_destination_amount,
      ),
      SwapCurve::Stable(curve) => curve.compute_out_amount(
        source_amount,
        swap_source_amount,
        swap_destination_amount,
        trade_direction,
      ),
    }
  }

  /// Marginal destination per source rate before any trade.
  pub fn spot_price(
    &self,
    swap_source_amount: u64,
    swap_destination_amount: u64,
    trade_direction: TradeDirection,
  ) -> Result<Decimal> {
    match self {
      SwapCurve::ConstantProduct(_) => {
        ConstantProduct::spot_price(swap_source_amount, swap_destination_amount)
      }
      SwapCurve::Stable(curve) => curve.spot_price_for(
        swap_source_amount,
        swap_destination_amount,
        trade_direction,
      ),
    }
  }

  /// Pool invariant over token base units.
  pub fn compute_d(&self, token_a_amount: u64, token_b_amount: u64) -> Result<U256> {
    match self {
      SwapCurve::ConstantProduct(curve) => {
        curve.compute_d(token_a_amount, token_b_amount)
      }
      SwapCurve::Stable(curve) => curve.invariant(token_a_amount, token_b_amount),
    }
  }

  /// Invariant in the units LP tokens are priced in.
  pub fn invariant_for_virtual_price(
    &self,
    token_a_amount: u64,
    token_b_amount: u64,
  ) -> Result<U256> {
    match self {
      SwapCurve::ConstantProduct(_) => {
        self.compute_d(token_a_amount, token_b_amount)
      }
      SwapCurve::Stable(curve) => curve
        .invariant_in_token_a(token_a_amount, token_b_amount)
        .map(U256::from),
    }
  }

  /// Pool tokens minted for an imbalanced deposit.
  #[allow(clippy::too_many_arguments)]
  pub fn compute_imbalance_deposit(
    &self,
    deposit_a: u64,
    deposit_b: u64,
    swap_a: u64,
    swap_b: u64,
    pool_token_supply: u64,
    fees: &PoolFees,
  ) -> Result<u64> {
    match self {
      SwapCurve::ConstantProduct(_) => Err(UnsupportedOperation.into()),
      SwapCurve::Stable(curve) => curve.compute_mint_amount_for_deposit(
        deposit_a,
        deposit_b,
        swap_a,
        swap_b,
        pool_token_supply,
        fees,
      ),
    }
  }

  /// Tokens of `side` paid for a single-sided withdrawal.
  pub fn compute_withdraw_one(
    &self,
    pool_token_amount: u64,
    pool_token_supply: u64,
    swap_a: u64,
    swap_b: u64,
    fees: &PoolFees,
    side: TokenSide,
  ) -> Result<u64> {
    match self {
      SwapCurve::ConstantProduct(_) => Err(UnsupportedOperation.into()),
      SwapCurve::Stable(curve) => curve.compute_withdraw_one(
        pool_token_amount,
        pool_token_supply,
        swap_a,
        swap_b,
        fees,
        side,
      ),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;
  use crate::depeg::{Depeg, DepegType};
  use crate::error::AmmError;
  use crate::pool::TokenMultiplier;

  fn marinade_stable() -> Result<CurveType> {
    Ok(CurveType::Stable {
      amp: 100,
      token_multiplier: TokenMultiplier::from_decimals(9, 9)?,
      depeg: Depeg {
        base_virtual_price: 0,
        base_cache_updated: 0,
        depeg_type: DepegType::Marinade,
      },
    })
  }

  #[test]
  fn depegged_curve_needs_oracle() -> Result<()> {
    let out =
      SwapCurve::load(&marinade_stable()?, &Pubkey::default(), &HashMap::new(), 0);
    assert_eq!(out.err(), Some(AmmError::MissingDepegAccount.into()));
    Ok(())
  }

  #[test]
  fn constant_product_rejects_single_sided_operations() {
    let curve = SwapCurve::ConstantProduct(ConstantProduct);
    let fees = PoolFees::zero();
    assert_eq!(
      curve
        .compute_imbalance_deposit(1, 0, 10, 10, 10, &fees)
        .err(),
      Some(AmmError::UnsupportedOperation.into())
    );
    assert_eq!(
      curve
        .compute_withdraw_one(1, 10, 10, 10, &fees, TokenSide::A)
        .err(),
      Some(AmmError::UnsupportedOperation.into())
    );
  }

  #[test]
  fn spot_price_per_curve() -> Result<()> {
    let cp = SwapCurve::ConstantProduct(ConstantProduct);
    assert_eq!(
      cp.spot_price(1_000_000, 2_000_000, TradeDirection::AToB)?,
      Decimal::TWO
    );
    let stable = SwapCurve::Stable(StableSwap::new(
      100,
      TokenMultiplier::from_decimals(6, 6)?,
      None,
    ));
    let spot = stable.spot_price(1_000_000, 1_000_000, TradeDirection::BToA)?;
    assert_eq!(spot, Decimal::ONE);
    Ok(())
  }

  #[test]
  fn invariant_per_curve() -> Result<()> {
    let cp = SwapCurve::ConstantProduct(ConstantProduct);
    assert_eq!(cp.compute_d(1_000_000, 4_000_000)?, U256::from(2_000_000u64));
    assert_eq!(
      cp.invariant_for_virtual_price(1_000_000, 4_000_000)?,
      U256::from(2_000_000u64)
    );
    // 6 and 9 decimals, so D counts token A in 9 decimals
    let stable = SwapCurve::Stable(StableSwap::new(
      100,
      TokenMultiplier::from_decimals(6, 9)?,
      None,
    ));
    assert_eq!(
      stable.compute_d(1_000_000, 1_000_000_000)?,
      U256::from(2_000_000_000u64)
    );
    assert_eq!(
      stable.invariant_for_virtual_price(1_000_000, 1_000_000_000)?,
      U256::from(2_000_000u64)
    );
    Ok(())
  }

  #[test]
  fn impact_is_relative_shortfall() -> Result<()> {
    let impact =
      price_impact(U256::from(1_000u64), U256::from(1_900u64), Decimal::TWO)?;
    assert_eq!(impact, Decimal::new(5, 2));
    let better =
      price_impact(U256::from(1_000u64), U256::from(2_100u64), Decimal::TWO)?;
    assert_eq!(better, Decimal::ZERO);
    Ok(())
  }
}
