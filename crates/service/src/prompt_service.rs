//! The prompt pipeline: resolve topic names, generate a lesson, persist.

use std::sync::Arc;

use chrono::Utc;
use lessonhub_core::{PromptRecord, PromptView};
use lessonhub_llm::{Generation, ResponseGenerator};
use lessonhub_storage::traits::PromptStore;
use lessonhub_storage::StorageBackend;

use crate::{ServiceError, TaxonomyService};

/// A validated submission.
#[derive(Debug, Clone)]
pub struct NewPrompt {
    pub user_id: String,
    pub category_id: String,
    pub sub_category_id: String,
    pub prompt: String,
}

pub struct PromptService {
    storage: Arc<StorageBackend>,
    taxonomy: TaxonomyService,
    generator: Arc<ResponseGenerator>,
}

impl PromptService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>, generator: Arc<ResponseGenerator>) -> Self {
        let taxonomy = TaxonomyService::new(Arc::clone(&storage));
        Self { storage, taxonomy, generator }
    }

    /// Submit a question and persist exactly one record for it.
    ///
    /// Input is assumed validated. Generation never fails; storage errors
    /// during lookup or insert are returned and nothing is stored.
    pub async fn submit(&self, input: NewPrompt) -> Result<PromptView, ServiceError> {
        let names = self.taxonomy.resolve_names(&input.category_id, &input.sub_category_id).await?;
        let prompt = input.prompt.trim().to_owned();

        let generation = self
            .generator
            .generate(&prompt, &names.category_name, &names.sub_category_name)
            .await;
        let live = generation.is_live();
        if let Generation::Fallback { cause, .. } = &generation {
            tracing::debug!(cause = cause.label(), "prompt answered with offline lesson");
        }

        let record = PromptRecord::new(
            uuid::Uuid::new_v4().to_string(),
            input.user_id,
            input.category_id,
            input.sub_category_id,
            prompt,
            generation.into_text(),
            Utc::now(),
        );
        self.storage.insert_prompt(&record).await?;
        tracing::info!(
            prompt_id = %record.id,
            user_id = %record.user_id,
            live,
            "prompt stored"
        );
        Ok(PromptView::new(record, names))
    }

    /// A user's history, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<PromptView>, ServiceError> {
        Ok(self.storage.list_prompts_for_user(user_id).await?)
    }

    #[must_use]
    pub fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }
}
