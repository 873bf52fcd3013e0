//! StatsStore implementation for PgStorage.

use super::*;

use crate::traits::StatsStore;
use async_trait::async_trait;
use lessonhub_core::{CategoryUsage, PlatformStats};

#[async_trait]
impl StatsStore for PgStorage {
    async fn get_platform_stats(&self, top_limit: usize) -> Result<PlatformStats, StorageError> {
        let (users, categories, sub_categories, prompts) = tokio::try_join!(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(&self.pool),
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories").fetch_one(&self.pool),
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sub_categories")
                .fetch_one(&self.pool),
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM prompts").fetch_one(&self.pool),
        )?;

        let rows = sqlx::query(
            "SELECT c.id, c.name, COUNT(*) AS count
               FROM prompts p
               JOIN categories c ON c.id = p.category_id
              GROUP BY c.id, c.name
              ORDER BY count DESC, c.name ASC
              LIMIT $1",
        )
        .bind(usize_to_i64(top_limit))
        .fetch_all(&self.pool)
        .await?;

        let top_categories = rows
            .iter()
            .map(|row| {
                Ok(CategoryUsage {
                    category_id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    count: i64_to_u64(row.try_get("count")?),
                })
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        Ok(PlatformStats {
            total_users: i64_to_u64(users),
            total_categories: i64_to_u64(categories),
            total_sub_categories: i64_to_u64(sub_categories),
            total_prompts: i64_to_u64(prompts),
            top_categories,
        })
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
