//! In-process storage backend.
//!
//! Used when no `DATABASE_URL` is configured and as the test double for the
//! service layer. Data lives as long as the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lessonhub_core::{
    AuthToken, Category, CategoryUsage, PlatformStats, PromptRecord, PromptView, SubCategory,
    TaxonomyNames, User, UserQuery,
};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::traits::{PromptStore, StatsStore, TaxonomyStore, TokenStore, UserStore};
use crate::types::PaginatedResult;

#[derive(Debug, Default)]
struct MemoryState {
    categories: Vec<Category>,
    sub_categories: Vec<SubCategory>,
    // Insertion order doubles as the tie-breaker for equal timestamps.
    prompts: Vec<PromptRecord>,
    users: Vec<User>,
    tokens: HashMap<String, AuthToken>,
}

impl MemoryState {
    fn category_name(&self, id: &str) -> Option<String> {
        self.categories.iter().find(|c| c.id == id).map(|c| c.name.clone())
    }

    fn sub_category_name(&self, id: &str) -> Option<String> {
        self.sub_categories.iter().find(|s| s.id == id).map(|s| s.name.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    state: Arc<RwLock<MemoryState>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while set, every operation fails with
    /// `StorageError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory backend marked unavailable".to_owned()));
        }
        Ok(())
    }
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[async_trait]
impl TaxonomyStore for MemoryStorage {
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        self.check_available()?;
        let mut categories = self.state.read().await.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: &str) -> Result<Option<Category>, StorageError> {
        self.check_available()?;
        Ok(self.state.read().await.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, StorageError> {
        self.check_available()?;
        Ok(self.state.read().await.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn find_category_name(&self, id: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.state.read().await.category_name(id))
    }

    async fn save_category(&self, category: &Category) -> Result<(), StorageError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.categories.iter().any(|c| c.name == category.name) {
            return Err(StorageError::Duplicate(format!(
                "category '{}' already exists",
                category.name
            )));
        }
        state.categories.push(category.clone());
        Ok(())
    }

    async fn list_sub_categories(
        &self,
        category_id: &str,
    ) -> Result<Vec<SubCategory>, StorageError> {
        self.check_available()?;
        let mut subs: Vec<SubCategory> = self
            .state
            .read()
            .await
            .sub_categories
            .iter()
            .filter(|s| s.category_id == category_id)
            .cloned()
            .collect();
        subs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subs)
    }

    async fn find_sub_category_name(&self, id: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.state.read().await.sub_category_name(id))
    }

    async fn save_sub_category(&self, sub_category: &SubCategory) -> Result<(), StorageError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state
            .sub_categories
            .iter()
            .any(|s| s.name == sub_category.name && s.category_id == sub_category.category_id)
        {
            return Err(StorageError::Duplicate(format!(
                "subcategory '{}' already exists in category {}",
                sub_category.name, sub_category.category_id
            )));
        }
        state.sub_categories.push(sub_category.clone());
        Ok(())
    }
}

#[async_trait]
impl PromptStore for MemoryStorage {
    async fn insert_prompt(&self, record: &PromptRecord) -> Result<(), StorageError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.prompts.iter().any(|p| p.id == record.id) {
            return Err(StorageError::Duplicate(format!("prompt '{}' already exists", record.id)));
        }
        state.prompts.push(record.clone());
        Ok(())
    }

    async fn list_prompts_for_user(&self, user_id: &str) -> Result<Vec<PromptView>, StorageError> {
        self.check_available()?;
        let state = self.state.read().await;
        // Reverse insertion order first so the stable sort keeps newer
        // inserts ahead of older ones with the same timestamp.
        let mut views: Vec<PromptView> = state
            .prompts
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id)
            .map(|p| {
                let names = TaxonomyNames::resolve(
                    state.category_name(&p.category_id),
                    state.sub_category_name(&p.sub_category_id),
                );
                PromptView::new(p.clone(), names)
            })
            .collect();
        views.sort_by(|a, b| b.record.created_at.cmp(&a.record.created_at));
        Ok(views)
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.phone == user.phone) {
            return Err(StorageError::Duplicate(format!("phone '{}' already registered", user.phone)));
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        self.check_available()?;
        Ok(self.state.read().await.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>, StorageError> {
        self.check_available()?;
        Ok(self.state.read().await.users.iter().find(|u| u.phone == phone).cloned())
    }

    async fn list_users(&self, query: &UserQuery) -> Result<PaginatedResult<User>, StorageError> {
        self.check_available()?;
        let state = self.state.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);
        let mut matching: Vec<&User> = state
            .users
            .iter()
            .rev()
            .filter(|u| query.role.is_none_or(|role| u.role == role))
            .filter(|u| {
                needle.as_deref().is_none_or(|n| {
                    contains_ignore_case(&u.name, n) || contains_ignore_case(&u.phone, n)
                })
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len();
        let items = matching.into_iter().skip(query.offset).take(query.limit).cloned().collect();
        Ok(PaginatedResult {
            items,
            total: u64::try_from(total).unwrap_or(u64::MAX),
            offset: u64::try_from(query.offset).unwrap_or(u64::MAX),
            limit: u64::try_from(query.limit).unwrap_or(u64::MAX),
        })
    }

    async fn delete_user(&self, id: &str) -> Result<bool, StorageError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Ok(false);
        }
        state.prompts.retain(|p| p.user_id != id);
        state.tokens.retain(|_, t| t.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TokenStore for MemoryStorage {
    async fn save_token(&self, token: &AuthToken) -> Result<(), StorageError> {
        self.check_available()?;
        self.state.write().await.tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn get_token(&self, token: &str) -> Result<Option<AuthToken>, StorageError> {
        self.check_available()?;
        Ok(self.state.read().await.tokens.get(token).cloned())
    }

    async fn delete_token(&self, token: &str) -> Result<bool, StorageError> {
        self.check_available()?;
        Ok(self.state.write().await.tokens.remove(token).is_some())
    }

    async fn purge_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, StorageError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let before = state.tokens.len();
        state.tokens.retain(|_, t| !t.is_expired(now));
        Ok(before.saturating_sub(state.tokens.len()))
    }
}

#[async_trait]
impl StatsStore for MemoryStorage {
    async fn get_platform_stats(&self, top_limit: usize) -> Result<PlatformStats, StorageError> {
        self.check_available()?;
        let state = self.state.read().await;

        let mut counts: HashMap<&str, u64> = HashMap::new();
        for prompt in &state.prompts {
            *counts.entry(prompt.category_id.as_str()).or_insert(0) += 1;
        }
        let mut top_categories: Vec<CategoryUsage> = counts
            .into_iter()
            .filter_map(|(id, count)| {
                state.category_name(id).map(|name| CategoryUsage {
                    category_id: id.to_owned(),
                    name,
                    count,
                })
            })
            .collect();
        top_categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        top_categories.truncate(top_limit);

        let len = |n: usize| u64::try_from(n).unwrap_or(u64::MAX);
        Ok(PlatformStats {
            total_users: len(state.users.len()),
            total_categories: len(state.categories.len()),
            total_sub_categories: len(state.sub_categories.len()),
            total_prompts: len(state.prompts.len()),
            top_categories,
        })
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.check_available()
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
