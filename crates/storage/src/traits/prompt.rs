use async_trait::async_trait;
use lessonhub_core::{PromptRecord, PromptView};

use crate::error::StorageError;

/// Prompt record operations. Records are write-once.
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Insert a new prompt record.
    async fn insert_prompt(&self, record: &PromptRecord) -> Result<(), StorageError>;

    /// All prompts of one user, newest first, with taxonomy names resolved
    /// (sentinels for ids that no longer resolve).
    async fn list_prompts_for_user(&self, user_id: &str) -> Result<Vec<PromptView>, StorageError>;
}
