//! Tunables for the state cache and quote defaults.
//!
//! Both structs deserialize with defaults for any missing field, so an empty
//! JSON object is a valid configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_SNAPSHOT_AGE_SECS: u64 = 30;
pub const DEFAULT_SLIPPAGE_BPS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Oldest snapshot, relative to the caller's clock, that may be quoted.
  pub max_snapshot_age_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      max_snapshot_age_secs: DEFAULT_MAX_SNAPSHOT_AGE_SECS,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
  /// Slippage applied when a caller does not pass one.
  pub default_slippage_bps: u64,
}

impl Default for QuoteConfig {
  fn default() -> Self {
    Self {
      default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
    }
  }
}

#[cfg(test)]
mod tests {
  use anyhow::Result;

  use super::*;

  #[test]
  fn empty_object_uses_defaults() -> Result<()> {
    let cache: CacheConfig = serde_json::from_str("{}")?;
    let quote: QuoteConfig = serde_json::from_str("{}")?;
    assert_eq!(cache, CacheConfig::default());
    assert_eq!(quote.default_slippage_bps, DEFAULT_SLIPPAGE_BPS);
    Ok(())
  }

  #[test]
  fn overrides() -> Result<()> {
    let cache: CacheConfig =
      serde_json::from_str(r#"{ "max_snapshot_age_secs": 5 }"#)?;
    assert_eq!(cache.max_snapshot_age_secs, 5);
    let json = serde_json::to_string(&QuoteConfig {
      default_slippage_bps: 100,
    })?;
    assert_eq!(json, r#"{"default_slippage_bps":100}"#);
    Ok(())
  }
}
