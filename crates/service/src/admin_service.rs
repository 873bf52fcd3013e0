use std::sync::Arc;

use lessonhub_core::{PlatformStats, TOP_CATEGORIES_LIMIT};
use lessonhub_storage::traits::StatsStore;
use lessonhub_storage::StorageBackend;

use crate::ServiceError;

pub struct AdminService {
    storage: Arc<StorageBackend>,
}

impl AdminService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    /// Platform totals plus the most-asked categories.
    pub async fn stats(&self) -> Result<PlatformStats, ServiceError> {
        Ok(self.storage.get_platform_stats(TOP_CATEGORIES_LIMIT).await?)
    }

    /// Whether the store answers at all.
    pub async fn storage_healthy(&self) -> bool {
        match self.storage.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "storage health check failed");
                false
            },
        }
    }

    #[must_use]
    pub fn storage_kind(&self) -> &'static str {
        self.storage.kind()
    }
}
