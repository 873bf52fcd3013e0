use std::sync::Arc;

use chrono::Utc;
use lessonhub_core::{Category, SubCategory, TaxonomyNames, DEFAULT_TAXONOMY};
use lessonhub_storage::traits::TaxonomyStore;
use lessonhub_storage::StorageBackend;
use serde::Serialize;

use crate::ServiceError;

/// What `seed_defaults` inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub categories_created: usize,
    pub sub_categories_created: usize,
}

#[derive(Clone)]
pub struct TaxonomyService {
    storage: Arc<StorageBackend>,
}

impl TaxonomyService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.storage.list_categories().await?)
    }

    pub async fn list_sub_categories(
        &self,
        category_id: &str,
    ) -> Result<Vec<SubCategory>, ServiceError> {
        Ok(self.storage.list_sub_categories(category_id).await?)
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidInput("category name is required".to_owned()));
        }
        let category = Category::new(uuid::Uuid::new_v4().to_string(), name.to_owned(), Utc::now());
        self.storage.save_category(&category).await?;
        tracing::info!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub async fn create_sub_category(
        &self,
        name: &str,
        category_id: &str,
    ) -> Result<SubCategory, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidInput("subcategory name is required".to_owned()));
        }
        if self.storage.get_category(category_id).await?.is_none() {
            return Err(ServiceError::not_found("category", category_id));
        }
        let sub = SubCategory::new(
            uuid::Uuid::new_v4().to_string(),
            name.to_owned(),
            category_id.to_owned(),
            Utc::now(),
        );
        self.storage.save_sub_category(&sub).await?;
        tracing::info!(id = %sub.id, name = %sub.name, category_id, "subcategory created");
        Ok(sub)
    }

    /// Display names for a prompt's taxonomy ids.
    ///
    /// Both lookups run concurrently. An id that does not resolve yields its
    /// sentinel name; a storage failure is returned as-is.
    pub async fn resolve_names(
        &self,
        category_id: &str,
        sub_category_id: &str,
    ) -> Result<TaxonomyNames, ServiceError> {
        let (category, sub_category) = tokio::join!(
            self.storage.find_category_name(category_id),
            self.storage.find_sub_category_name(sub_category_id),
        );
        let names = TaxonomyNames::resolve(category?, sub_category?);
        if !names.is_fully_resolved() {
            tracing::debug!(category_id, sub_category_id, "taxonomy id did not resolve, using sentinel");
        }
        Ok(names)
    }

    /// Insert the default categories and subcategories that are missing.
    /// Running it twice inserts nothing the second time.
    pub async fn seed_defaults(&self) -> Result<SeedReport, ServiceError> {
        let mut report = SeedReport::default();
        for (category_name, sub_names) in DEFAULT_TAXONOMY {
            let category = match self.storage.get_category_by_name(category_name).await? {
                Some(existing) => existing,
                None => {
                    report.categories_created += 1;
                    self.create_category(category_name).await?
                },
            };
            let existing = self.storage.list_sub_categories(&category.id).await?;
            for sub_name in *sub_names {
                if existing.iter().any(|s| s.name == *sub_name) {
                    continue;
                }
                self.create_sub_category(sub_name, &category.id).await?;
                report.sub_categories_created += 1;
            }
        }
        tracing::info!(
            categories = report.categories_created,
            sub_categories = report.sub_categories_created,
            "default taxonomy seeded"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use lessonhub_core::{UNKNOWN_CATEGORY, UNKNOWN_SUB_CATEGORY};

    use super::*;
    use crate::test_support::memory_backend;

    #[tokio::test]
    async fn create_category_trims_and_rejects_blank() {
        let (storage, _) = memory_backend();
        let service = TaxonomyService::new(storage);
        let created = service.create_category("  Science ").await.unwrap();
        assert_eq!(created.name, "Science");
        assert!(matches!(
            service.create_category("   ").await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(service.create_category("Science").await.unwrap_err().is_duplicate());
    }

    #[tokio::test]
    async fn sub_category_requires_existing_parent() {
        let (storage, _) = memory_backend();
        let service = TaxonomyService::new(storage);
        let err = service.create_sub_category("Basics", "missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn resolve_names_uses_sentinels_for_unknown_ids() {
        let (storage, _) = memory_backend();
        let service = TaxonomyService::new(storage);
        let category = service.create_category("Technology").await.unwrap();
        let sub = service.create_sub_category("Programming", &category.id).await.unwrap();

        let names = service.resolve_names(&category.id, &sub.id).await.unwrap();
        assert_eq!(names.category_name, "Technology");
        assert_eq!(names.sub_category_name, "Programming");

        let names = service.resolve_names("nope", &sub.id).await.unwrap();
        assert_eq!(names.category_name, UNKNOWN_CATEGORY);
        assert_eq!(names.sub_category_name, "Programming");

        let names = service.resolve_names(&category.id, "nope").await.unwrap();
        assert_eq!(names.sub_category_name, UNKNOWN_SUB_CATEGORY);
    }

    #[tokio::test]
    async fn resolve_names_propagates_storage_failure() {
        let (storage, memory) = memory_backend();
        let service = TaxonomyService::new(storage);
        memory.set_unavailable(true);
        assert!(matches!(
            service.resolve_names("a", "b").await,
            Err(ServiceError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let (storage, _) = memory_backend();
        let service = TaxonomyService::new(storage);
        let first = service.seed_defaults().await.unwrap();
        assert_eq!(first.categories_created, 5);
        assert_eq!(first.sub_categories_created, 20);
        assert_eq!(service.seed_defaults().await.unwrap(), SeedReport::default());

        let names: Vec<String> =
            service.list_categories().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["History", "Languages", "Mathematics", "Science", "Technology"]);
    }
}
