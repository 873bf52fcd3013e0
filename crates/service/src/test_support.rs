use std::sync::Arc;

use lessonhub_storage::{MemoryStorage, StorageBackend};

/// A memory-backed `StorageBackend` plus a handle to toggle outages.
pub(crate) fn memory_backend() -> (Arc<StorageBackend>, MemoryStorage) {
    let memory = MemoryStorage::new();
    (Arc::new(StorageBackend::from(memory.clone())), memory)
}
