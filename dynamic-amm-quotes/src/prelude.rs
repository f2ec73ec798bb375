//! Common imports for dynamic-amm-quotes.

pub use anchor_lang::prelude::Pubkey;
pub use anyhow::Result;
// Core model
pub use dynamic_amm_core::curve::SwapCurve;
pub use dynamic_amm_core::depeg::{Depeg, DepegAccounts, DepegType};
pub use dynamic_amm_core::error::AmmError;
pub use dynamic_amm_core::fees::PoolFees;
pub use dynamic_amm_core::pool::{
  CurveType, PoolState, TokenMultiplier, TokenSide, TradeDirection,
};
pub use dynamic_amm_core::vault::{LockedProfitTracker, VaultState};
pub use rust_decimal::Decimal;

// Snapshot state
pub use crate::state::{
  AccountsInfo, PoolSnapshot, SnapshotProvider, StateCache,
};
// Quote types
pub use crate::{
  get_deposit_quote, get_pool_info, get_swap_quote, get_virtual_price,
  get_withdraw_quote, CacheConfig, DepositQuote, PoolInfo, ProgramLogError,
  QuoteConfig, SwapQuote, SwapQuoteParam, SwapResult, WithdrawQuote,
};
