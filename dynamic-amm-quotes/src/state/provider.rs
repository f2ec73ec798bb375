//! Snapshot provider trait
//!
//! Fetching raw accounts is left to implementations, so the cache can be fed
//! from RPC, a geyser stream or fixtures alike.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::state::PoolSnapshot;

/// Source of consistent pool snapshots
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
  /// Fetch the current pool snapshot
  ///
  /// # Errors
  /// Returns error if any account cannot be fetched or decoded.
  async fn fetch_snapshot(&self) -> Result<PoolSnapshot>;
}

#[async_trait]
impl<T: SnapshotProvider + ?Sized> SnapshotProvider for Arc<T> {
  async fn fetch_snapshot(&self) -> Result<PoolSnapshot> {
    (**self).fetch_snapshot().await
  }
}
