//! TaxonomyStore implementation for PgStorage.

use super::*;

use crate::traits::TaxonomyStore;
use async_trait::async_trait;

#[async_trait]
impl TaxonomyStore for PgStorage {
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let rows = sqlx::query("SELECT id, name, created_at FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_category).collect()
    }

    async fn get_category(&self, id: &str) -> Result<Option<Category>, StorageError> {
        let row = sqlx::query("SELECT id, name, created_at FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_category).transpose()
    }

    async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, StorageError> {
        let row = sqlx::query("SELECT id, name, created_at FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_category).transpose()
    }

    async fn find_category_name(&self, id: &str) -> Result<Option<String>, StorageError> {
        Ok(sqlx::query_scalar("SELECT name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save_category(&self, category: &Category) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(category.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_sub_categories(
        &self,
        category_id: &str,
    ) -> Result<Vec<SubCategory>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, name, category_id, created_at FROM sub_categories
               WHERE category_id = $1 ORDER BY name ASC",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_sub_category).collect()
    }

    async fn find_sub_category_name(&self, id: &str) -> Result<Option<String>, StorageError> {
        Ok(sqlx::query_scalar("SELECT name FROM sub_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save_sub_category(&self, sub_category: &SubCategory) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO sub_categories (id, name, category_id, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&sub_category.id)
        .bind(&sub_category.name)
        .bind(&sub_category.category_id)
        .bind(sub_category.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
