//! Pool snapshot types.
//!
//! A snapshot is captured in one read so every account it holds reflects the
//! same chain state.

use dynamic_amm_core::depeg::DepegAccounts;
use dynamic_amm_core::pool::PoolState;
use dynamic_amm_core::vault::VaultState;
use serde::{Deserialize, Serialize};

use crate::quote_params::SwapQuoteParam;

/// Scalar account fields read alongside the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsInfo {
  /// Liquid balance of vault A's token account
  pub vault_a_reserve: u64,
  /// Liquid balance of vault B's token account
  pub vault_b_reserve: u64,
  pub vault_a_lp_supply: u64,
  pub vault_b_lp_supply: u64,
  /// Vault A LP held by the pool
  pub pool_vault_a_lp: u64,
  /// Vault B LP held by the pool
  pub pool_vault_b_lp: u64,
  pub pool_lp_supply: u64,
  /// Cluster unix timestamp at capture
  pub current_time: u64,
}

/// Complete pool state that quotes are computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
  pub pool_state: PoolState,
  pub vault_a: VaultState,
  pub vault_b: VaultState,
  pub accounts_info: AccountsInfo,
  /// Oracle accounts for depegged stableswap pools
  pub depeg_accounts: DepegAccounts,
  /// Timestamp of when this snapshot was captured
  pub fetched_at: u64,
}

impl PoolSnapshot {
  #[must_use]
  pub fn new(
    pool_state: PoolState,
    vault_a: VaultState,
    vault_b: VaultState,
    accounts_info: AccountsInfo,
    depeg_accounts: DepegAccounts,
  ) -> PoolSnapshot {
    PoolSnapshot {
      pool_state,
      vault_a,
      vault_b,
      fetched_at: accounts_info.current_time,
      accounts_info,
      depeg_accounts,
    }
  }

  /// Seconds between capture and `now`, zero if `now` is earlier.
  #[must_use]
  pub fn age(&self, now: u64) -> u64 {
    now.saturating_sub(self.fetched_at)
  }

  /// Borrowed quote inputs.
  #[must_use]
  pub fn quote_param(&self) -> SwapQuoteParam<'_> {
    let info = &self.accounts_info;
    SwapQuoteParam {
      pool_state: &self.pool_state,
      vault_a: &self.vault_a,
      vault_b: &self.vault_b,
      pool_vault_a_lp: info.pool_vault_a_lp,
      pool_vault_b_lp: info.pool_vault_b_lp,
      vault_a_lp_supply: info.vault_a_lp_supply,
      vault_b_lp_supply: info.vault_b_lp_supply,
      vault_a_reserve: info.vault_a_reserve,
      vault_b_reserve: info.vault_b_reserve,
      pool_lp_supply: info.pool_lp_supply,
      current_time: info.current_time,
      depeg_accounts: &self.depeg_accounts,
    }
  }
}
