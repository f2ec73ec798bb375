//! Quotes for a vault-backed dynamic AMM pool.
//!
//! Computes swap, deposit and withdraw quotes from a cached [`PoolSnapshot`]
//! without touching the network. Snapshots are supplied by a
//! [`SnapshotProvider`] and held in a [`StateCache`] that swaps them
//! atomically.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dynamic_amm_quotes::prelude::*;
//!
//! # async fn example(provider: impl SnapshotProvider) -> anyhow::Result<()> {
//! let snapshot = provider.fetch_snapshot().await?;
//! let now = snapshot.fetched_at;
//! let in_mint = snapshot.pool_state.token_a_mint;
//! let cache = StateCache::new(snapshot, CacheConfig::default());
//!
//! // 1 token A (6 decimals) with the default 0.5% slippage
//! let quote = cache.swap_quote(&in_mint, 1_000_000, None, now)?;
//! println!("{} out, at least {}", quote.amount_out, quote.min_amount_out);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod prelude;
pub mod program_error;
pub mod quote_computer;
pub mod quote_params;
pub mod state;

pub use config::{CacheConfig, QuoteConfig};
pub use program_error::ProgramLogError;
pub use quote_computer::{
  get_deposit_quote, get_pool_info, get_swap_quote, get_virtual_price,
  get_withdraw_quote,
};
pub use quote_params::{
  DepositQuote, PoolInfo, SwapQuote, SwapQuoteParam, SwapResult,
  WithdrawQuote,
};
pub use state::{AccountsInfo, PoolSnapshot, SnapshotProvider, StateCache};
