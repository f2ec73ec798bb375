//! Latest pool snapshot shared between a refresher and quoting callers.
//!
//! Readers load an `Arc` of the current snapshot without locking; a refresh
//! replaces the whole snapshot at once, so a quote never mixes accounts from
//! two captures.

use std::sync::Arc;

use anchor_lang::prelude::Pubkey;
use anyhow::Result;
use arc_swap::ArcSwap;
use dynamic_amm_core::error::AmmError::StaleSnapshot;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{CacheConfig, QuoteConfig};
use crate::quote_computer::{
  amm_error, get_deposit_quote, get_pool_info, get_swap_quote,
  get_virtual_price, get_withdraw_quote,
};
use crate::quote_params::{DepositQuote, PoolInfo, SwapQuote, WithdrawQuote};
use crate::state::{PoolSnapshot, SnapshotProvider};

pub struct StateCache {
  snapshot: ArcSwap<PoolSnapshot>,
  cache_config: CacheConfig,
  quote_config: QuoteConfig,
}

impl StateCache {
  #[must_use]
  pub fn new(snapshot: PoolSnapshot, cache_config: CacheConfig) -> Self {
    Self {
      snapshot: ArcSwap::from_pointee(snapshot),
      cache_config,
      quote_config: QuoteConfig::default(),
    }
  }

  #[must_use]
  pub fn with_quote_config(self, quote_config: QuoteConfig) -> Self {
    Self {
      quote_config,
      ..self
    }
  }

  /// Current snapshot regardless of age.
  #[must_use]
  pub fn snapshot(&self) -> Arc<PoolSnapshot> {
    self.snapshot.load_full()
  }

  /// Installs `snapshot`, returning the one it replaced.
  pub fn replace(&self, snapshot: PoolSnapshot) -> Arc<PoolSnapshot> {
    debug!(fetched_at = snapshot.fetched_at, "replacing pool snapshot");
    self.snapshot.swap(Arc::new(snapshot))
  }

  /// Fetches a new snapshot from `provider` and installs it.
  ///
  /// # Errors
  /// Propagates the provider's error, the cached snapshot is kept.
  pub async fn refresh<P: SnapshotProvider + ?Sized>(
    &self,
    provider: &P,
  ) -> Result<Arc<PoolSnapshot>> {
    match provider.fetch_snapshot().await {
      Ok(snapshot) => {
        let installed = Arc::new(snapshot);
        debug!(
          fetched_at = installed.fetched_at,
          "installing refreshed snapshot"
        );
        self.snapshot.store(Arc::clone(&installed));
        Ok(installed)
      }
      Err(err) => {
        warn!(%err, "snapshot refresh failed, keeping cached snapshot");
        Err(err)
      }
    }
  }

  /// Current snapshot if it is within the configured age at `now`.
  ///
  /// # Errors
  /// `StaleSnapshot` once the snapshot is older than
  /// `max_snapshot_age_secs`.
  pub fn fresh_snapshot(&self, now: u64) -> Result<Arc<PoolSnapshot>> {
    let snapshot = self.snapshot();
    let age = snapshot.age(now);
    if age > self.cache_config.max_snapshot_age_secs {
      warn!(
        age,
        max_age = self.cache_config.max_snapshot_age_secs,
        "pool snapshot is stale"
      );
      return Err(amm_error(StaleSnapshot));
    }
    Ok(snapshot)
  }

  fn slippage(&self, slippage_bps: Option<u64>) -> u64 {
    slippage_bps.unwrap_or(self.quote_config.default_slippage_bps)
  }

  pub fn swap_quote(
    &self,
    in_token_mint: &Pubkey,
    in_amount: u64,
    slippage_bps: Option<u64>,
    now: u64,
  ) -> Result<SwapQuote> {
    let snapshot = self.fresh_snapshot(now)?;
    get_swap_quote(
      in_token_mint,
      in_amount,
      self.slippage(slippage_bps),
      &snapshot.quote_param(),
    )
  }

  pub fn deposit_quote(
    &self,
    token_a_in_amount: u64,
    token_b_in_amount: u64,
    is_imbalance: bool,
    slippage_bps: Option<u64>,
    now: u64,
  ) -> Result<DepositQuote> {
    let snapshot = self.fresh_snapshot(now)?;
    get_deposit_quote(
      token_a_in_amount,
      token_b_in_amount,
      is_imbalance,
      self.slippage(slippage_bps),
      &snapshot.quote_param(),
    )
  }

  pub fn withdraw_quote(
    &self,
    withdraw_token_amount: u64,
    slippage_bps: Option<u64>,
    token_mint: Option<&Pubkey>,
    now: u64,
  ) -> Result<WithdrawQuote> {
    let snapshot = self.fresh_snapshot(now)?;
    get_withdraw_quote(
      withdraw_token_amount,
      self.slippage(slippage_bps),
      token_mint,
      &snapshot.quote_param(),
    )
  }

  pub fn pool_info(&self, now: u64) -> Result<PoolInfo> {
    get_pool_info(&self.fresh_snapshot(now)?.quote_param())
  }

  pub fn virtual_price(&self, now: u64) -> Result<Decimal> {
    get_virtual_price(&self.fresh_snapshot(now)?.quote_param())
  }
}
