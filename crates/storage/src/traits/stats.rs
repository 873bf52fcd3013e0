use async_trait::async_trait;
use lessonhub_core::PlatformStats;

use crate::error::StorageError;

/// Aggregate statistics and liveness.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Entity counters plus the `top_limit` most prompted categories.
    async fn get_platform_stats(&self, top_limit: usize) -> Result<PlatformStats, StorageError>;

    /// Cheap round-trip proving the backend can serve requests.
    async fn ping(&self) -> Result<(), StorageError>;
}
