use anchor_lang::prelude::error_code;

#[error_code]
pub enum AmmError {
  // `math`
  #[msg("Widened intermediate exceeds the representable range.")]
  ArithmeticOverflow = 7000,
  #[msg("Division by a zero reserve or supply.")]
  DivisionByZero,
  // `curve`
  #[msg("Pool has no liquidity on one side and cannot be quoted.")]
  EmptyPool,
  #[msg("Stableswap invariant did not converge within the iteration bound.")]
  ConvergenceFailure,
  #[msg("Operation is not supported by this curve type.")]
  UnsupportedOperation,
  // `depeg`
  #[msg("Depeg oracle account is missing from the snapshot.")]
  MissingDepegAccount,
  #[msg("Depeg oracle account data could not be decoded.")]
  InvalidDepegAccount,
  // `pool`
  #[msg("Mint does not match either pool token.")]
  UnknownMint,
  #[msg("Pool is disabled.")]
  PoolDisabled,
  #[msg("Balanced deposit takes exactly one non-zero token amount.")]
  InvalidDepositAmounts,
  #[msg("Output amount is not covered by the vault's liquid reserve.")]
  InsufficientVaultLiquidity,
  #[msg("Swap result in zero.")]
  ZeroOutput,
  // `snapshot`
  #[msg("Cached snapshot is older than the configured staleness bound.")]
  StaleSnapshot,
}
