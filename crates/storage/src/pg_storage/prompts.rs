//! PromptStore implementation for PgStorage.

use super::*;

use crate::traits::PromptStore;
use async_trait::async_trait;

#[async_trait]
impl PromptStore for PgStorage {
    async fn insert_prompt(&self, record: &PromptRecord) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO prompts (id, user_id, category_id, sub_category_id, prompt, response, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.category_id)
        .bind(&record.sub_category_id)
        .bind(&record.prompt)
        .bind(&record.response)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_prompts_for_user(&self, user_id: &str) -> Result<Vec<PromptView>, StorageError> {
        let sql = format!(
            "{PROMPT_VIEW_SELECT} WHERE p.user_id = $1 ORDER BY p.created_at DESC, p.seq DESC"
        );
        let rows = sqlx::query(&sql).bind(user_id).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_prompt_view).collect()
    }
}
