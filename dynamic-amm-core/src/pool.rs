use anchor_lang::prelude::*;

use crate::depeg::Depeg;
use crate::error::AmmError::{ArithmeticOverflow, PoolDisabled, UnknownMint};
use crate::fees::PoolFees;

/// Scales both stableswap tokens to a common number of decimals.
///   `real_amount = amount * multiplier * 10^(-precision_factor)`
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
pub struct TokenMultiplier {
  pub token_a_multiplier: u64,
  pub token_b_multiplier: u64,
  pub precision_factor: u8,
}

impl TokenMultiplier {
  /// Multipliers lifting the token with fewer decimals up to the other.
  pub fn from_decimals(
    token_a_decimals: u8,
    token_b_decimals: u8,
  ) -> Result<TokenMultiplier> {
    let precision_factor = token_a_decimals.max(token_b_decimals);
    let multiplier = |decimals: u8| {
      10u64
        .checked_pow(u32::from(precision_factor - decimals))
        .ok_or(ArithmeticOverflow)
    };
    Ok(TokenMultiplier {
      token_a_multiplier: multiplier(token_a_decimals)?,
      token_b_multiplier: multiplier(token_b_decimals)?,
      precision_factor,
    })
  }
}

/// Invariant family of a pool, fixed at creation.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize,
)]
pub enum CurveType {
  ConstantProduct,
  Stable {
    amp: u64,
    token_multiplier: TokenMultiplier,
    depeg: Depeg,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
  AToB,
  BToA,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSide {
  A,
  B,
}

impl TradeDirection {
  #[must_use]
  pub fn source(self) -> TokenSide {
    match self {
      TradeDirection::AToB => TokenSide::A,
      TradeDirection::BToA => TokenSide::B,
    }
  }
}

/// Pool account as read from chain.
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct PoolState {
  pub lp_mint: Pubkey,
  pub token_a_mint: Pubkey,
  pub token_b_mint: Pubkey,
  pub a_vault: Pubkey,
  pub b_vault: Pubkey,
  pub a_vault_lp: Pubkey,
  pub b_vault_lp: Pubkey,
  pub enabled: bool,
  pub stake: Pubkey,
  pub token_a_decimals: u8,
  pub token_b_decimals: u8,
  pub fees: PoolFees,
  pub curve_type: CurveType,
}

impl PoolState {
  /// Which pool token `mint` is.
  pub fn token_side(&self, mint: &Pubkey) -> Result<TokenSide> {
    if *mint == self.token_a_mint {
      Ok(TokenSide::A)
    } else if *mint == self.token_b_mint {
      Ok(TokenSide::B)
    } else {
      Err(UnknownMint.into())
    }
  }

  /// Direction of a swap that takes `in_mint` as input.
  pub fn trade_direction(&self, in_mint: &Pubkey) -> Result<TradeDirection> {
    match self.token_side(in_mint)? {
      TokenSide::A => Ok(TradeDirection::AToB),
      TokenSide::B => Ok(TradeDirection::BToA),
    }
  }

  pub fn ensure_enabled(&self) -> Result<()> {
    if self.enabled {
      Ok(())
    } else {
      Err(PoolDisabled.into())
    }
  }
}
