#![allow(dead_code)]

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use dynamic_amm_quotes::prelude::*;

pub const NOW: u64 = 1_700_000_000;

/// Vaults hold this many times what the pool owns.
const VAULT_DEPTH: u64 = 10;

pub fn pool_state(curve_type: CurveType, fees: PoolFees) -> PoolState {
  PoolState {
    lp_mint: Pubkey::new_unique(),
    token_a_mint: Pubkey::new_unique(),
    token_b_mint: Pubkey::new_unique(),
    a_vault: Pubkey::new_unique(),
    b_vault: Pubkey::new_unique(),
    a_vault_lp: Pubkey::new_unique(),
    b_vault_lp: Pubkey::new_unique(),
    enabled: true,
    stake: Pubkey::new_unique(),
    token_a_decimals: 6,
    token_b_decimals: 6,
    fees,
    curve_type,
  }
}

/// Snapshot whose vaults trade one vault LP for one token, fully unlocked.
pub fn snapshot_at_par(
  pool_state: PoolState,
  token_a_amount: u64,
  token_b_amount: u64,
  pool_lp_supply: u64,
) -> PoolSnapshot {
  let vault_a_total = token_a_amount.max(1) * VAULT_DEPTH;
  let vault_b_total = token_b_amount.max(1) * VAULT_DEPTH;
  PoolSnapshot::new(
    pool_state,
    VaultState::unlocked(vault_a_total),
    VaultState::unlocked(vault_b_total),
    AccountsInfo {
      vault_a_reserve: vault_a_total,
      vault_b_reserve: vault_b_total,
      vault_a_lp_supply: vault_a_total,
      vault_b_lp_supply: vault_b_total,
      pool_vault_a_lp: token_a_amount,
      pool_vault_b_lp: token_b_amount,
      pool_lp_supply,
      current_time: NOW,
    },
    HashMap::new(),
  )
}

pub fn constant_product(
  token_a_amount: u64,
  token_b_amount: u64,
  fees: PoolFees,
) -> PoolSnapshot {
  snapshot_at_par(
    pool_state(CurveType::ConstantProduct, fees),
    token_a_amount,
    token_b_amount,
    token_a_amount,
  )
}

pub fn stable_curve(amp: u64, depeg: Depeg) -> CurveType {
  CurveType::Stable {
    amp,
    token_multiplier: TokenMultiplier {
      token_a_multiplier: 1,
      token_b_multiplier: 1,
      precision_factor: 6,
    },
    depeg,
  }
}

/// Pegged stableswap pool with LP supply equal to the summed reserves.
pub fn stable(
  token_a_amount: u64,
  token_b_amount: u64,
  amp: u64,
  fees: PoolFees,
) -> PoolSnapshot {
  snapshot_at_par(
    pool_state(stable_curve(amp, Depeg::none()), fees),
    token_a_amount,
    token_b_amount,
    token_a_amount + token_b_amount,
  )
}

/// Reprices one vault so a vault LP redeems `withdrawable / vault_lp_supply`
/// tokens, with `locked_profit` on top that has not started unlocking.
pub fn reprice_vault(
  snapshot: &mut PoolSnapshot,
  side: TokenSide,
  vault_lp_supply: u64,
  withdrawable: u64,
  locked_profit: u64,
) {
  let total = withdrawable + locked_profit;
  let vault = VaultState::new(
    total,
    LockedProfitTracker {
      last_updated_locked_profit: locked_profit,
      last_report: snapshot.accounts_info.current_time,
      locked_profit_degradation: 1_000_000_000,
    },
  );
  let info = &mut snapshot.accounts_info;
  match side {
    TokenSide::A => {
      snapshot.vault_a = vault;
      info.vault_a_lp_supply = vault_lp_supply;
      info.vault_a_reserve = total;
    }
    TokenSide::B => {
      snapshot.vault_b = vault;
      info.vault_b_lp_supply = vault_lp_supply;
      info.vault_b_reserve = total;
    }
  }
}

/// Tokens one vault LP can be worth after rounding, `ceil(w / l)`.
pub fn share_price_ceil(withdrawable: u64, vault_lp_supply: u64) -> u64 {
  withdrawable.div_ceil(vault_lp_supply)
}

/// Lido state account data with the given SOL per stSOL rate.
pub fn lido_account(sol_balance: u64, st_sol_supply: u64) -> Vec<u8> {
  let mut data = vec![0u8; 128];
  data[73..81].copy_from_slice(&st_sol_supply.to_le_bytes());
  data[81..89].copy_from_slice(&sol_balance.to_le_bytes());
  data
}

/// The anchor error behind a failed quote, if any.
pub fn amm_error_of<T>(result: Result<T>) -> Option<anchor_lang::error::Error> {
  result.err()?.downcast::<anchor_lang::error::Error>().ok()
}

/// Provider that always returns a clone of one snapshot.
pub struct FixedProvider(pub PoolSnapshot);

#[async_trait]
impl SnapshotProvider for FixedProvider {
  async fn fetch_snapshot(&self) -> Result<PoolSnapshot> {
    Ok(self.0.clone())
  }
}

pub struct FailingProvider;

#[async_trait]
impl SnapshotProvider for FailingProvider {
  async fn fetch_snapshot(&self) -> Result<PoolSnapshot> {
    Err(anyhow!("rpc unavailable"))
  }
}
