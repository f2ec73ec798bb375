//! Borrowed quote inputs and the quote result types.

use dynamic_amm_core::depeg::DepegAccounts;
use dynamic_amm_core::pool::{PoolState, TokenSide};
use dynamic_amm_core::vault::{amount_by_share, VaultState};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything a quote reads, borrowed from one consistent snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SwapQuoteParam<'a> {
  pub pool_state: &'a PoolState,
  pub vault_a: &'a VaultState,
  pub vault_b: &'a VaultState,
  pub pool_vault_a_lp: u64,
  pub pool_vault_b_lp: u64,
  pub vault_a_lp_supply: u64,
  pub vault_b_lp_supply: u64,
  /// Liquid tokens held by vault A's token account.
  pub vault_a_reserve: u64,
  pub vault_b_reserve: u64,
  pub pool_lp_supply: u64,
  pub current_time: u64,
  pub depeg_accounts: &'a DepegAccounts,
}

/// One side of the pool seen through its vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VaultPosition {
  pub pool_vault_lp: u64,
  pub vault_lp_supply: u64,
  pub withdrawable_amount: u64,
  pub reserve: u64,
}

impl VaultPosition {
  /// Pool's token-denominated balance in this vault.
  pub fn token_amount(&self) -> anchor_lang::Result<u64> {
    amount_by_share(
      self.pool_vault_lp,
      self.withdrawable_amount,
      self.vault_lp_supply,
    )
  }
}

impl SwapQuoteParam<'_> {
  pub(crate) fn position(
    &self,
    side: TokenSide,
  ) -> anchor_lang::Result<VaultPosition> {
    let (vault, pool_vault_lp, vault_lp_supply, reserve) = match side {
      TokenSide::A => (
        self.vault_a,
        self.pool_vault_a_lp,
        self.vault_a_lp_supply,
        self.vault_a_reserve,
      ),
      TokenSide::B => (
        self.vault_b,
        self.pool_vault_b_lp,
        self.vault_b_lp_supply,
        self.vault_b_reserve,
      ),
    };
    Ok(VaultPosition {
      pool_vault_lp,
      vault_lp_supply,
      withdrawable_amount: vault.withdrawable_amount(self.current_time)?,
      reserve,
    })
  }
}

/// Token-denominated pool reserves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
  pub token_a_amount: u64,
  pub token_b_amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
  pub amount_in: u64,
  pub amount_out: u64,
  pub min_amount_out: u64,
  /// Trade fee charged on the input, in input token units.
  pub fee: u64,
  pub price_impact: Decimal,
}

impl SwapQuote {
  #[must_use]
  pub fn zero() -> SwapQuote {
    SwapQuote {
      amount_in: 0,
      amount_out: 0,
      min_amount_out: 0,
      fee: 0,
      price_impact: Decimal::ZERO,
    }
  }
}

/// Reporting view of an executed or quoted swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
  pub amount_out: u64,
  pub price_impact: Decimal,
  pub fee: u64,
}

impl From<&SwapQuote> for SwapResult {
  fn from(quote: &SwapQuote) -> Self {
    SwapResult {
      amount_out: quote.amount_out,
      price_impact: quote.price_impact,
      fee: quote.fee,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositQuote {
  pub pool_token_amount_out: u64,
  pub min_pool_token_amount_out: u64,
  pub token_a_in_amount: u64,
  pub token_b_in_amount: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawQuote {
  pub pool_token_amount_in: u64,
  pub token_a_out_amount: u64,
  pub token_b_out_amount: u64,
  pub min_token_a_out_amount: u64,
  pub min_token_b_out_amount: u64,
}
