mod cache;
mod provider;
mod snapshot;

pub use cache::StateCache;
pub use provider::SnapshotProvider;
pub use snapshot::{AccountsInfo, PoolSnapshot};
