//! Vault share accounting.
//!
//! Pools hold vault LP rather than raw tokens, so every token-denominated
//! reserve is derived from the pool's vault LP balance and the vault's
//! withdrawable amount.

use anchor_lang::prelude::*;

use crate::error::AmmError::{ArithmeticOverflow, DivisionByZero};
use crate::math::mul_div_floor;

/// Profit released by a vault report unlocks linearly over
/// `DENOMINATOR / locked_profit_degradation` seconds.
pub const LOCKED_PROFIT_DEGRADATION_DENOMINATOR: u128 = 1_000_000_000_000;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  AnchorSerialize,
  AnchorDeserialize,
)]
pub struct LockedProfitTracker {
  pub last_updated_locked_profit: u64,
  pub last_report: u64,
  pub locked_profit_degradation: u64,
}

impl LockedProfitTracker {
  /// Profit still locked at `current_time`.
  pub fn locked_profit(&self, current_time: u64) -> Result<u64> {
    let duration = current_time
      .checked_sub(self.last_report)
      .ok_or(ArithmeticOverflow)?;
    let locked_fund_ratio =
      u128::from(duration) * u128::from(self.locked_profit_degradation);
    if locked_fund_ratio > LOCKED_PROFIT_DEGRADATION_DENOMINATOR {
      return Ok(0);
    }
    let remaining =
      LOCKED_PROFIT_DEGRADATION_DENOMINATOR - locked_fund_ratio;
    let locked = u128::from(self.last_updated_locked_profit) * remaining
      / LOCKED_PROFIT_DEGRADATION_DENOMINATOR;
    u64::try_from(locked).map_err(|_| ArithmeticOverflow.into())
  }
}

/// Read-only view of a yield vault.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  AnchorSerialize,
  AnchorDeserialize,
)]
pub struct VaultState {
  pub total_amount: u64,
  pub locked_profit_tracker: LockedProfitTracker,
}

impl VaultState {
  #[must_use]
  pub fn new(
    total_amount: u64,
    locked_profit_tracker: LockedProfitTracker,
  ) -> VaultState {
    VaultState {
      total_amount,
      locked_profit_tracker,
    }
  }

  /// Vault with no pending profit, every token is withdrawable.
  #[must_use]
  pub fn unlocked(total_amount: u64) -> VaultState {
    VaultState::new(total_amount, LockedProfitTracker::default())
  }

  /// Total amount minus profit that is still unlocking.
  pub fn withdrawable_amount(&self, current_time: u64) -> Result<u64> {
    let locked = self.locked_profit_tracker.locked_profit(current_time)?;
    self
      .total_amount
      .checked_sub(locked)
      .ok_or(ArithmeticOverflow.into())
  }
}

/// Tokens redeemable for `share` vault LP.
///   `share * withdrawable / lp_supply`
pub fn amount_by_share(
  share: u64,
  withdrawable_amount: u64,
  lp_supply: u64,
) -> Result<u64> {
  if lp_supply == 0 {
    return Err(DivisionByZero.into());
  }
  mul_div_floor(share, withdrawable_amount, lp_supply)
}

/// Vault LP corresponding to a token amount.
///   `amount * lp_supply / withdrawable`
pub fn unmint_amount(
  amount: u64,
  withdrawable_amount: u64,
  lp_supply: u64,
) -> Result<u64> {
  if withdrawable_amount == 0 {
    return Err(DivisionByZero.into());
  }
  mul_div_floor(amount, lp_supply, withdrawable_amount)
}

/// Increase in the pool's token-denominated balance after `deposit_amount` is
/// deposited into the vault on its behalf.
///
/// Minting vault LP floors, so the pool may be credited slightly less than
/// was deposited.
pub fn actual_deposit_amount(
  deposit_amount: u64,
  before_amount: u64,
  pool_vault_lp: u64,
  vault_lp_supply: u64,
  withdrawable_amount: u64,
) -> Result<u64> {
  if deposit_amount == 0 {
    return Ok(0);
  }
  let vault_lp_minted =
    unmint_amount(deposit_amount, withdrawable_amount, vault_lp_supply)?;
  let lp_supply_after = vault_lp_supply
    .checked_add(vault_lp_minted)
    .ok_or(ArithmeticOverflow)?;
  let withdrawable_after = withdrawable_amount
    .checked_add(deposit_amount)
    .ok_or(ArithmeticOverflow)?;
  let pool_vault_lp_after = pool_vault_lp
    .checked_add(vault_lp_minted)
    .ok_or(ArithmeticOverflow)?;
  let after_amount = amount_by_share(
    pool_vault_lp_after,
    withdrawable_after,
    lp_supply_after,
  )?;
  after_amount
    .checked_sub(before_amount)
    .ok_or(ArithmeticOverflow.into())
}
