mod common;

use anyhow::Result;
use common::*;
use dynamic_amm_quotes::prelude::*;
use proptest::prelude::*;

#[test]
fn balanced_constant_product_deposit() -> Result<()> {
  let snapshot =
    constant_product(1_000_000_000, 2_000_000_000, PoolFees::zero());
  let quote =
    get_deposit_quote(1_000_000, 0, false, 50, &snapshot.quote_param())?;
  assert_eq!(quote.pool_token_amount_out, 1_000_000);
  assert_eq!(quote.min_pool_token_amount_out, 995_000);
  assert_eq!(quote.token_a_in_amount, 1_000_000);
  assert_eq!(quote.token_b_in_amount, 2_000_000);
  Ok(())
}

#[test]
fn balanced_deposit_from_token_b() -> Result<()> {
  let snapshot =
    constant_product(1_000_000_000, 2_000_000_000, PoolFees::zero());
  let quote =
    get_deposit_quote(0, 3_000_001, false, 0, &snapshot.quote_param())?;
  // LP floors to 1_500_000, token amounts round up
  assert_eq!(quote.pool_token_amount_out, 1_500_000);
  assert_eq!(quote.token_a_in_amount, 1_500_000);
  assert_eq!(quote.token_b_in_amount, 3_000_000);
  Ok(())
}

#[test]
fn round_trip_through_appreciated_vault() -> Result<()> {
  let mut snapshot = snapshot_at_par(
    pool_state(CurveType::ConstantProduct, PoolFees::zero()),
    1_000_000_007,
    1_333_333_333,
    1_000_000_007,
  );
  // One vault B LP redeems 1.5 tokens
  reprice_vault(
    &mut snapshot,
    TokenSide::B,
    20_000_000_000,
    30_000_000_000,
    0,
  );
  let params = snapshot.quote_param();
  let deposit = get_deposit_quote(1_000, 0, false, 0, &params)?;
  assert_eq!(deposit.pool_token_amount_out, 1_000);
  assert_eq!(deposit.token_a_in_amount, 1_000);
  // 1_334 vault LP rounded up, then 2_001 tokens rounded up
  assert_eq!(deposit.token_b_in_amount, 2_001);

  let withdraw = get_withdraw_quote(1_000, 0, None, &params)?;
  assert_eq!(withdraw.token_a_out_amount, 1_000);
  // 1_333 vault LP rounded down, then 1_999 tokens rounded down
  assert_eq!(withdraw.token_b_out_amount, 1_999);
  Ok(())
}

#[test]
fn balanced_stable_deposit_rounds_other_side_up() -> Result<()> {
  let snapshot = stable(1_000_000_000, 3_000_000_001, 100, PoolFees::zero());
  let quote = get_deposit_quote(1_000, 0, false, 0, &snapshot.quote_param())?;
  assert_eq!(quote.token_a_in_amount, 1_000);
  assert_eq!(quote.token_b_in_amount, 3_001);
  Ok(())
}

#[test]
fn balanced_deposit_takes_one_side() {
  let snapshot =
    constant_product(1_000_000_000, 2_000_000_000, PoolFees::zero());
  let out = get_deposit_quote(1_000, 2_000, false, 50, &snapshot.quote_param());
  assert_eq!(amm_error_of(out), Some(AmmError::InvalidDepositAmounts.into()));
}

#[test]
fn zero_deposit_is_zero_quote() -> Result<()> {
  let snapshot =
    constant_product(1_000_000_000, 2_000_000_000, PoolFees::zero());
  let quote = get_deposit_quote(0, 0, false, 50, &snapshot.quote_param())?;
  assert_eq!(quote, DepositQuote::default());
  Ok(())
}

#[test]
fn imbalanced_deposit_unsupported_on_constant_product() {
  let snapshot =
    constant_product(1_000_000_000, 2_000_000_000, PoolFees::zero());
  let out = get_deposit_quote(1_000, 5, true, 50, &snapshot.quote_param());
  assert_eq!(amm_error_of(out), Some(AmmError::UnsupportedOperation.into()));
}

#[test]
fn balanced_stable_deposit() -> Result<()> {
  let snapshot = stable(1_000_000_000, 1_000_000_000, 100, PoolFees::zero());
  let quote =
    get_deposit_quote(10_000_000, 0, false, 0, &snapshot.quote_param())?;
  assert_eq!(quote.pool_token_amount_out, 20_000_000);
  assert_eq!(quote.token_a_in_amount, 10_000_000);
  assert_eq!(quote.token_b_in_amount, 10_000_000);
  Ok(())
}

#[test]
fn imbalanced_stable_deposit() -> Result<()> {
  let fees = PoolFees::new(4, 1_000, 0, 1);
  let snapshot = stable(1_000_000_000, 1_000_000_000, 100, fees);
  let proportional =
    get_deposit_quote(10_000_000, 10_000_000, true, 0, &snapshot.quote_param())?;
  assert_eq!(proportional.pool_token_amount_out, 20_000_000);

  let one_sided =
    get_deposit_quote(20_000_000, 0, true, 100, &snapshot.quote_param())?;
  assert!(one_sided.pool_token_amount_out < 20_000_000);
  assert!(one_sided.pool_token_amount_out > 19_800_000);
  assert!(
    one_sided.min_pool_token_amount_out < one_sided.pool_token_amount_out
  );
  assert_eq!(one_sided.token_a_in_amount, 20_000_000);
  assert_eq!(one_sided.token_b_in_amount, 0);
  Ok(())
}

#[test]
fn deposit_into_disabled_pool() {
  let mut snapshot = stable(1_000_000_000, 1_000_000_000, 100, PoolFees::zero());
  snapshot.pool_state.enabled = false;
  let out = get_deposit_quote(1_000, 0, false, 50, &snapshot.quote_param());
  assert_eq!(amm_error_of(out), Some(AmmError::PoolDisabled.into()));
}

#[test]
fn balanced_withdraw() -> Result<()> {
  let snapshot =
    constant_product(1_000_000_000, 2_000_000_000, PoolFees::zero());
  let quote = get_withdraw_quote(1_000_000, 100, None, &snapshot.quote_param())?;
  assert_eq!(quote.pool_token_amount_in, 1_000_000);
  assert_eq!(quote.token_a_out_amount, 1_000_000);
  assert_eq!(quote.token_b_out_amount, 2_000_000);
  assert_eq!(quote.min_token_a_out_amount, 990_000);
  assert_eq!(quote.min_token_b_out_amount, 1_980_000);
  Ok(())
}

#[test]
fn single_sided_stable_withdraw() -> Result<()> {
  let snapshot = stable(1_000_000_000, 1_000_000_000, 100, PoolFees::zero());
  let token_b = snapshot.pool_state.token_b_mint;
  let quote =
    get_withdraw_quote(20_000_000, 50, Some(&token_b), &snapshot.quote_param())?;
  assert_eq!(quote.token_a_out_amount, 0);
  assert!(quote.token_b_out_amount < 20_000_000);
  assert!(quote.token_b_out_amount > 19_900_000);
  assert!(quote.min_token_b_out_amount <= quote.token_b_out_amount);
  Ok(())
}

#[test]
fn single_sided_withdraw_unsupported_on_constant_product() {
  let snapshot =
    constant_product(1_000_000_000, 2_000_000_000, PoolFees::zero());
  let token_a = snapshot.pool_state.token_a_mint;
  let out =
    get_withdraw_quote(1_000, 50, Some(&token_a), &snapshot.quote_param());
  assert_eq!(amm_error_of(out), Some(AmmError::UnsupportedOperation.into()));
}

#[test]
fn withdraw_into_unknown_mint() {
  let snapshot = stable(1_000_000_000, 1_000_000_000, 100, PoolFees::zero());
  let lp_mint = snapshot.pool_state.lp_mint;
  let out =
    get_withdraw_quote(1_000, 50, Some(&lp_mint), &snapshot.quote_param());
  assert_eq!(amm_error_of(out), Some(AmmError::UnknownMint.into()));
}

#[test]
fn virtual_price_at_launch_is_one() -> Result<()> {
  let cp = constant_product(1_000_000_000, 1_000_000_000, PoolFees::zero());
  assert_eq!(get_virtual_price(&cp.quote_param())?, Decimal::ONE);
  let ss = stable(1_000_000_000, 1_000_000_000, 100, PoolFees::zero());
  assert_eq!(get_virtual_price(&ss.quote_param())?, Decimal::ONE);
  Ok(())
}

#[test]
fn virtual_price_without_supply() -> Result<()> {
  let mut snapshot =
    constant_product(1_000_000_000, 1_000_000_000, PoolFees::zero());
  snapshot.accounts_info.pool_lp_supply = 0;
  assert_eq!(get_virtual_price(&snapshot.quote_param())?, Decimal::ZERO);
  Ok(())
}

proptest! {
  #[test]
  fn round_trip_through_repriced_vaults(
    pool_vault_a_lp in 1_000_000u64..1_000_000_000_000,
    pool_vault_b_lp in 1_000_000u64..1_000_000_000_000,
    price_a_bps in 10_001u64..30_000,
    price_b_bps in 10_001u64..30_000,
    locked_profit in 0u64..1_000_000_000,
    deposit in 1u64..1_000_000,
    is_stable in any::<bool>(),
  ) {
    let curve_type = if is_stable {
      stable_curve(100, Depeg::none())
    } else {
      CurveType::ConstantProduct
    };
    let mut snapshot = snapshot_at_par(
      pool_state(curve_type, PoolFees::zero()),
      pool_vault_a_lp,
      pool_vault_b_lp,
      pool_vault_a_lp + pool_vault_b_lp,
    );
    let (lp_a, lp_b) = (pool_vault_a_lp * 2, pool_vault_b_lp * 2);
    let (w_a, w_b) = (lp_a * price_a_bps / 10_000, lp_b * price_b_bps / 10_000);
    reprice_vault(&mut snapshot, TokenSide::A, lp_a, w_a, locked_profit);
    reprice_vault(&mut snapshot, TokenSide::B, lp_b, w_b, 0);
    let (slack_a, slack_b) =
      (share_price_ceil(w_a, lp_a), share_price_ceil(w_b, lp_b));

    let params = snapshot.quote_param();
    let deposit_quote = get_deposit_quote(deposit, 0, false, 0, &params)
      .map_err(|e| TestCaseError::fail(e.to_string()))?;
    let withdraw_quote =
      get_withdraw_quote(deposit_quote.pool_token_amount_out, 0, None, &params)
        .map_err(|e| TestCaseError::fail(e.to_string()))?;

    let (a_in, b_in) =
      (deposit_quote.token_a_in_amount, deposit_quote.token_b_in_amount);
    let (a_out, b_out) =
      (withdraw_quote.token_a_out_amount, withdraw_quote.token_b_out_amount);
    prop_assert!(a_out <= a_in);
    prop_assert!(b_out <= b_in);
    if is_stable {
      // LP minted from the typed amount rounds down once more
      prop_assert_eq!(a_in, deposit);
      prop_assert!(a_in - a_out <= 2 * slack_a + 1);
      prop_assert!(b_in - b_out <= 2 * slack_b + 2);
    } else {
      prop_assert!(a_in <= deposit + slack_a + 1);
      prop_assert!(a_in - a_out <= slack_a + 1);
      prop_assert!(b_in - b_out <= slack_b + 1);
    }
  }

  #[test]
  fn deposit_then_withdraw_round_trip(
    token_a_amount in 1_000_000u64..1_000_000_000_000,
    token_b_amount in 1_000_000u64..1_000_000_000_000,
    deposit in 1u64..1_000_000_000,
  ) {
    let snapshot =
      constant_product(token_a_amount, token_b_amount, PoolFees::zero());
    let params = snapshot.quote_param();
    let deposit_quote = get_deposit_quote(deposit, 0, false, 0, &params)
      .map_err(|e| TestCaseError::fail(e.to_string()))?;
    let withdraw_quote =
      get_withdraw_quote(deposit_quote.pool_token_amount_out, 0, None, &params)
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert!(
      deposit_quote.token_a_in_amount - withdraw_quote.token_a_out_amount <= 1
    );
    prop_assert!(
      deposit_quote.token_b_in_amount - withdraw_quote.token_b_out_amount <= 1
    );
  }
}
