//! Swap, deposit and withdraw quotes over a borrowed pool snapshot.
//!
//! Each function is a pure computation over [`SwapQuoteParam`]: reserves are
//! derived from vault shares, the pool's curve is resolved, and amounts are
//! re-measured through the vaults the way the on-chain program settles them.

use anchor_lang::prelude::Pubkey;
use anyhow::Result;
use dynamic_amm_core::curve::SwapCurve;
use dynamic_amm_core::error::AmmError::{
  self, ArithmeticOverflow, EmptyPool, InsufficientVaultLiquidity,
  InvalidDepositAmounts, ZeroOutput,
};
use dynamic_amm_core::math::{mul_div_ceil, mul_div_floor, ratio_to_decimal};
use dynamic_amm_core::pool::{TokenSide, TradeDirection};
use dynamic_amm_core::slippage::amount_with_slippage;
use dynamic_amm_core::vault::{
  actual_deposit_amount, amount_by_share, unmint_amount,
};
use rust_decimal::Decimal;
use tracing::debug;

use crate::quote_params::{
  DepositQuote, PoolInfo, SwapQuote, SwapQuoteParam, VaultPosition,
  WithdrawQuote,
};

/// Lifts a core error code into the quote error type, keeping it
/// downcastable to [`anchor_lang::error::Error`].
pub(crate) fn amm_error(code: AmmError) -> anyhow::Error {
  anchor_lang::error::Error::from(code).into()
}

fn load_curve(params: &SwapQuoteParam) -> Result<SwapCurve> {
  let pool = params.pool_state;
  Ok(SwapCurve::load(
    &pool.curve_type,
    &pool.stake,
    params.depeg_accounts,
    params.current_time,
  )?)
}

/// Positions and token reserves of both sides, failing on an empty side.
fn funded_positions(
  params: &SwapQuoteParam,
) -> Result<(VaultPosition, VaultPosition, PoolInfo)> {
  let a = params.position(TokenSide::A)?;
  let b = params.position(TokenSide::B)?;
  let info = PoolInfo {
    token_a_amount: a.token_amount()?,
    token_b_amount: b.token_amount()?,
  };
  if info.token_a_amount == 0 || info.token_b_amount == 0 {
    return Err(amm_error(EmptyPool));
  }
  Ok((a, b, info))
}

/// Token-denominated reserves of the pool.
pub fn get_pool_info(params: &SwapQuoteParam) -> Result<PoolInfo> {
  Ok(PoolInfo {
    token_a_amount: params.position(TokenSide::A)?.token_amount()?,
    token_b_amount: params.position(TokenSide::B)?.token_amount()?,
  })
}

/// Pool invariant per LP token. Zero while no LP supply exists.
pub fn get_virtual_price(params: &SwapQuoteParam) -> Result<Decimal> {
  if params.pool_lp_supply == 0 {
    return Ok(Decimal::ZERO);
  }
  let info = get_pool_info(params)?;
  let d = load_curve(params)?
    .invariant_for_virtual_price(info.token_a_amount, info.token_b_amount)?;
  Ok(ratio_to_decimal(d, params.pool_lp_supply.into())?)
}

/// Quote for swapping `in_amount` of `in_token_mint`.
///
/// The protocol's cut of the trade fee leaves the pool, the rest of the input
/// is deposited into the source vault. The LP share of the fee stays in the
/// pool and is excluded from the curve input.
///
/// A non-zero input that pays out nothing fails with `ZeroOutput`, since the
/// program rejects such a swap.
pub fn get_swap_quote(
  in_token_mint: &Pubkey,
  in_amount: u64,
  slippage_bps: u64,
  params: &SwapQuoteParam,
) -> Result<SwapQuote> {
  let pool = params.pool_state;
  let trade_direction = pool.trade_direction(in_token_mint)?;
  pool.ensure_enabled()?;
  if in_amount == 0 {
    return Ok(SwapQuote::zero());
  }

  let (a, b, _) = funded_positions(params)?;
  let (source, destination) = match trade_direction {
    TradeDirection::AToB => (a, b),
    TradeDirection::BToA => (b, a),
  };
  let source_amount = source.token_amount()?;
  let destination_amount = destination.token_amount()?;
  let curve = load_curve(params)?;

  let trade_fee = pool.fees.trading_fee(in_amount)?;
  let protocol_fee = pool.fees.protocol_trading_fee(trade_fee)?;
  let lp_fee = trade_fee
    .checked_sub(protocol_fee)
    .ok_or_else(|| amm_error(ArithmeticOverflow))?;
  let deposited = in_amount
    .checked_sub(protocol_fee)
    .ok_or_else(|| amm_error(ArithmeticOverflow))?;
  let actual_in = actual_deposit_amount(
    deposited,
    source_amount,
    source.pool_vault_lp,
    source.vault_lp_supply,
    source.withdrawable_amount,
  )?;
  let curve_in = actual_in.saturating_sub(lp_fee);
  if curve_in == 0 {
    return Err(amm_error(ZeroOutput));
  }

  let outcome = curve.compute_out_amount(
    curve_in,
    source_amount,
    destination_amount,
    trade_direction,
  )?;
  let out_vault_lp = unmint_amount(
    outcome.out_amount,
    destination.withdrawable_amount,
    destination.vault_lp_supply,
  )?;
  let amount_out = amount_by_share(
    out_vault_lp,
    destination.withdrawable_amount,
    destination.vault_lp_supply,
  )?;
  if amount_out == 0 {
    return Err(amm_error(ZeroOutput));
  }
  if amount_out >= destination.reserve {
    return Err(amm_error(InsufficientVaultLiquidity));
  }

  let quote = SwapQuote {
    amount_in: in_amount,
    amount_out,
    min_amount_out: amount_with_slippage(amount_out, slippage_bps)?,
    fee: trade_fee,
    price_impact: outcome.price_impact,
  };
  debug!(
    ?trade_direction,
    in_amount,
    amount_out,
    trade_fee,
    protocol_fee,
    %quote.price_impact,
    "swap quote"
  );
  Ok(quote)
}

/// Token amounts a user supplies for `pool_token_amount`, rounded up through
/// each vault's LP.
fn constant_product_in_amounts(
  pool_token_amount: u64,
  pool_lp_supply: u64,
  a: &VaultPosition,
  b: &VaultPosition,
) -> Result<(u64, u64)> {
  let token_in = |position: &VaultPosition| -> Result<u64> {
    let vault_lp =
      mul_div_ceil(pool_token_amount, position.pool_vault_lp, pool_lp_supply)?;
    Ok(mul_div_ceil(
      vault_lp,
      position.withdrawable_amount,
      position.vault_lp_supply,
    )?)
  };
  Ok((token_in(a)?, token_in(b)?))
}

/// Quote for adding liquidity.
///
/// A balanced deposit names exactly one side and derives the other from the
/// pool ratio, rounded up. An imbalanced deposit takes both amounts as given and mints
/// through the stableswap invariant.
pub fn get_deposit_quote(
  token_a_in_amount: u64,
  token_b_in_amount: u64,
  is_imbalance: bool,
  slippage_bps: u64,
  params: &SwapQuoteParam,
) -> Result<DepositQuote> {
  let pool = params.pool_state;
  pool.ensure_enabled()?;
  if token_a_in_amount == 0 && token_b_in_amount == 0 {
    return Ok(DepositQuote::default());
  }
  if !is_imbalance && token_a_in_amount != 0 && token_b_in_amount != 0 {
    return Err(amm_error(InvalidDepositAmounts));
  }

  let (a, b, info) = funded_positions(params)?;
  let curve = load_curve(params)?;

  let (pool_token_amount_out, token_a_in_amount, token_b_in_amount) =
    if is_imbalance {
      let actual_a = actual_deposit_amount(
        token_a_in_amount,
        info.token_a_amount,
        a.pool_vault_lp,
        a.vault_lp_supply,
        a.withdrawable_amount,
      )?;
      let actual_b = actual_deposit_amount(
        token_b_in_amount,
        info.token_b_amount,
        b.pool_vault_lp,
        b.vault_lp_supply,
        b.withdrawable_amount,
      )?;
      let minted = curve.compute_imbalance_deposit(
        actual_a,
        actual_b,
        info.token_a_amount,
        info.token_b_amount,
        params.pool_lp_supply,
        &pool.fees,
      )?;
      (minted, token_a_in_amount, token_b_in_amount)
    } else {
      let (amount, reserve) = if token_a_in_amount != 0 {
        (token_a_in_amount, info.token_a_amount)
      } else {
        (token_b_in_amount, info.token_b_amount)
      };
      let minted = mul_div_floor(amount, params.pool_lp_supply, reserve)?;
      let (a_in, b_in) = match curve {
        SwapCurve::ConstantProduct(_) => constant_product_in_amounts(
          minted,
          params.pool_lp_supply,
          &a,
          &b,
        )?,
        SwapCurve::Stable(_) if token_a_in_amount != 0 => (
          token_a_in_amount,
          mul_div_ceil(amount, info.token_b_amount, reserve)?,
        ),
        SwapCurve::Stable(_) => (
          mul_div_ceil(amount, info.token_a_amount, reserve)?,
          token_b_in_amount,
        ),
      };
      (minted, a_in, b_in)
    };

  let quote = DepositQuote {
    pool_token_amount_out,
    min_pool_token_amount_out: amount_with_slippage(
      pool_token_amount_out,
      slippage_bps,
    )?,
    token_a_in_amount,
    token_b_in_amount,
  };
  debug!(
    is_imbalance,
    pool_token_amount_out = quote.pool_token_amount_out,
    token_a_in_amount = quote.token_a_in_amount,
    token_b_in_amount = quote.token_b_in_amount,
    "deposit quote"
  );
  Ok(quote)
}

/// Quote for burning `withdraw_token_amount` LP tokens, into both sides or
/// into `token_mint` alone.
pub fn get_withdraw_quote(
  withdraw_token_amount: u64,
  slippage_bps: u64,
  token_mint: Option<&Pubkey>,
  params: &SwapQuoteParam,
) -> Result<WithdrawQuote> {
  let pool = params.pool_state;
  let side = token_mint.map(|mint| pool.token_side(mint)).transpose()?;
  if withdraw_token_amount == 0 {
    return Ok(WithdrawQuote::default());
  }
  let (a, b, info) = funded_positions(params)?;

  let (token_a_out_amount, token_b_out_amount) = match side {
    None => {
      let redeem = |position: &VaultPosition| -> Result<u64> {
        let vault_lp_burn = mul_div_floor(
          withdraw_token_amount,
          position.pool_vault_lp,
          params.pool_lp_supply,
        )?;
        Ok(amount_by_share(
          vault_lp_burn,
          position.withdrawable_amount,
          position.vault_lp_supply,
        )?)
      };
      (redeem(&a)?, redeem(&b)?)
    }
    Some(side) => {
      let out_amount = load_curve(params)?.compute_withdraw_one(
        withdraw_token_amount,
        params.pool_lp_supply,
        info.token_a_amount,
        info.token_b_amount,
        &pool.fees,
        side,
      )?;
      let position = match side {
        TokenSide::A => &a,
        TokenSide::B => &b,
      };
      let vault_lp_burn = unmint_amount(
        out_amount,
        position.withdrawable_amount,
        position.vault_lp_supply,
      )?;
      let redeemed = amount_by_share(
        vault_lp_burn,
        position.withdrawable_amount,
        position.vault_lp_supply,
      )?;
      match side {
        TokenSide::A => (redeemed, 0),
        TokenSide::B => (0, redeemed),
      }
    }
  };

  let quote = WithdrawQuote {
    pool_token_amount_in: withdraw_token_amount,
    token_a_out_amount,
    token_b_out_amount,
    min_token_a_out_amount: amount_with_slippage(
      token_a_out_amount,
      slippage_bps,
    )?,
    min_token_b_out_amount: amount_with_slippage(
      token_b_out_amount,
      slippage_bps,
    )?,
  };
  debug!(
    ?side,
    withdraw_token_amount,
    token_a_out_amount,
    token_b_out_amount,
    "withdraw quote"
  );
  Ok(quote)
}
