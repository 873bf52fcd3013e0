use async_trait::async_trait;
use lessonhub_core::{Category, SubCategory};

use crate::error::StorageError;

/// Category and subcategory operations.
#[async_trait]
pub trait TaxonomyStore: Send + Sync {
    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError>;

    /// Get category by ID.
    async fn get_category(&self, id: &str) -> Result<Option<Category>, StorageError>;

    /// Get category by exact name.
    async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, StorageError>;

    /// Display name of a category, `None` when the id does not resolve.
    async fn find_category_name(&self, id: &str) -> Result<Option<String>, StorageError>;

    /// Insert a category. Fails with `Duplicate` if the name is taken.
    async fn save_category(&self, category: &Category) -> Result<(), StorageError>;

    /// Subcategories of one category ordered by name.
    async fn list_sub_categories(
        &self,
        category_id: &str,
    ) -> Result<Vec<SubCategory>, StorageError>;

    /// Display name of a subcategory, `None` when the id does not resolve.
    async fn find_sub_category_name(&self, id: &str) -> Result<Option<String>, StorageError>;

    /// Insert a subcategory. Fails with `Duplicate` on `(name, category_id)` collision.
    async fn save_sub_category(&self, sub_category: &SubCategory) -> Result<(), StorageError>;
}
