//! Staking oracles backing depegged stableswap pools.
//!
//! A depegged pool pairs a base token with a liquid staking token whose value
//! grows against it. The growth is read from the staking program's state
//! account and expressed as a virtual price with [`PRECISION`] decimals.

use std::collections::HashMap;

use anchor_lang::prelude::*;

use crate::error::AmmError::{InvalidDepegAccount, MissingDepegAccount};
use crate::math::mul_div_floor;

/// Decimal precision of virtual prices, `1.0 == 10^6`.
pub const PRECISION: u64 = 1_000_000;

/// Seconds the pool's cached virtual price stays authoritative.
pub const BASE_CACHE_EXPIRES: u64 = 60 * 10;

/// Marinade program state holding the mSOL price.
pub const MARINADE_STATE: Pubkey =
  pubkey!("8szGkuLTAux9XMgZ2vtY39jVSowEcpBfFfD8hXSEqdGC");

/// Lido program state holding stSOL supply and SOL balance.
pub const LIDO_STATE: Pubkey =
  pubkey!("49Yi1TKkNyYjPAFdR9LBvoHcUjuPX4Df5T5yv39w2XTn");

const MARINADE_MSOL_PRICE_OFFSET: usize = 512;
const MARINADE_PRICE_DENOMINATOR: u64 = 1 << 32;
const LIDO_ST_SOL_SUPPLY_OFFSET: usize = 73;
const LIDO_SOL_BALANCE_OFFSET: usize = 81;
const SPL_STAKE_TOTAL_LAMPORTS_OFFSET: usize = 258;
const SPL_STAKE_POOL_TOKEN_SUPPLY_OFFSET: usize = 266;

/// Raw oracle account data keyed by account address.
pub type DepegAccounts = HashMap<Pubkey, Vec<u8>>;

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
pub enum DepegType {
  #[default]
  None,
  Marinade,
  Lido,
  SplStake,
}

/// Underlying value per staking token as a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRate {
  pub numerator: u64,
  pub denominator: u64,
}

impl ExchangeRate {
  /// Rate scaled to [`PRECISION`].
  pub fn virtual_price(&self) -> Result<u64> {
    if self.denominator == 0 {
      return Err(InvalidDepegAccount.into());
    }
    mul_div_floor(self.numerator, PRECISION, self.denominator)
  }
}

fn read_u64(data: &[u8], offset: usize) -> Option<u64> {
  let bytes = data.get(offset..offset.checked_add(8)?)?;
  bytes.try_into().ok().map(u64::from_le_bytes)
}

impl DepegType {
  /// Address of the oracle account, `None` for pegged pools.
  #[must_use]
  pub fn oracle_account(&self, stake: &Pubkey) -> Option<Pubkey> {
    match self {
      DepegType::None => None,
      DepegType::Marinade => Some(MARINADE_STATE),
      DepegType::Lido => Some(LIDO_STATE),
      DepegType::SplStake => Some(*stake),
    }
  }

  /// Reads the staking exchange rate out of the oracle account data.
  pub fn decode_exchange_rate(&self, data: &[u8]) -> Result<ExchangeRate> {
    let (numerator, denominator) = match self {
      DepegType::None => (Some(PRECISION), Some(PRECISION)),
      DepegType::Marinade => (
        read_u64(data, MARINADE_MSOL_PRICE_OFFSET),
        Some(MARINADE_PRICE_DENOMINATOR),
      ),
      DepegType::Lido => (
        read_u64(data, LIDO_SOL_BALANCE_OFFSET),
        read_u64(data, LIDO_ST_SOL_SUPPLY_OFFSET),
      ),
      DepegType::SplStake => (
        read_u64(data, SPL_STAKE_TOTAL_LAMPORTS_OFFSET),
        read_u64(data, SPL_STAKE_POOL_TOKEN_SUPPLY_OFFSET),
      ),
    };
    match (numerator, denominator) {
      (Some(numerator), Some(denominator)) if denominator > 0 => {
        Ok(ExchangeRate {
          numerator,
          denominator,
        })
      }
      _ => Err(InvalidDepegAccount.into()),
    }
  }
}

/// Depeg configuration stored on a stableswap pool.
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
pub struct Depeg {
  pub base_virtual_price: u64,
  pub base_cache_updated: u64,
  pub depeg_type: DepegType,
}

impl Depeg {
  #[must_use]
  pub fn none() -> Depeg {
    Depeg::default()
  }

  /// Virtual price of token B in token A at `current_time`.
  ///
  /// The oracle account is required even while the pool's cached price is
  /// still fresh, so a snapshot missing it never quotes.
  pub fn virtual_price(
    &self,
    stake: &Pubkey,
    depeg_accounts: &DepegAccounts,
    current_time: u64,
  ) -> Result<Option<u64>> {
    let Some(oracle) = self.depeg_type.oracle_account(stake) else {
      return Ok(None);
    };
    let data = depeg_accounts.get(&oracle).ok_or(MissingDepegAccount)?;
    let live = self.depeg_type.decode_exchange_rate(data)?.virtual_price()?;
    let cache_fresh = self
      .base_cache_updated
      .checked_add(BASE_CACHE_EXPIRES)
      .is_some_and(|expiry| current_time <= expiry);
    if cache_fresh && self.base_virtual_price > 0 {
      Ok(Some(self.base_virtual_price))
    } else {
      Ok(Some(live))
    }
  }
}
