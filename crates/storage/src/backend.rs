//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lessonhub_core::{
    AuthToken, Category, PlatformStats, PromptRecord, PromptView, SubCategory, User, UserQuery,
};

use crate::error::StorageError;
use crate::memory::MemoryStorage;
use crate::traits::{PromptStore, StatsStore, TaxonomyStore, TokenStore, UserStore};
use crate::types::PaginatedResult;

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            #[cfg(feature = "postgres")]
            StorageBackend::Postgres(s) => <crate::pg_storage::PgStorage as $trait>::$method(s, $($arg),*).await,
            StorageBackend::Memory(s) => <MemoryStorage as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    #[cfg(feature = "postgres")]
    Postgres(crate::pg_storage::PgStorage),
    Memory(MemoryStorage),
}

impl StorageBackend {
    #[cfg(feature = "postgres")]
    pub async fn new_postgres(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(crate::pg_storage::PgStorage::new(database_url).await?))
    }

    #[must_use]
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStorage::new())
    }

    /// Short backend label for logs and the health endpoint.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl From<MemoryStorage> for StorageBackend {
    fn from(storage: MemoryStorage) -> Self {
        Self::Memory(storage)
    }
}

// ── TaxonomyStore ────────────────────────────────────────────────

#[async_trait]
impl TaxonomyStore for StorageBackend {
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        dispatch!(self, TaxonomyStore, list_categories())
    }

    async fn get_category(&self, id: &str) -> Result<Option<Category>, StorageError> {
        dispatch!(self, TaxonomyStore, get_category(id))
    }

    async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, StorageError> {
        dispatch!(self, TaxonomyStore, get_category_by_name(name))
    }

    async fn find_category_name(&self, id: &str) -> Result<Option<String>, StorageError> {
        dispatch!(self, TaxonomyStore, find_category_name(id))
    }

    async fn save_category(&self, category: &Category) -> Result<(), StorageError> {
        dispatch!(self, TaxonomyStore, save_category(category))
    }

    async fn list_sub_categories(
        &self,
        category_id: &str,
    ) -> Result<Vec<SubCategory>, StorageError> {
        dispatch!(self, TaxonomyStore, list_sub_categories(category_id))
    }

    async fn find_sub_category_name(&self, id: &str) -> Result<Option<String>, StorageError> {
        dispatch!(self, TaxonomyStore, find_sub_category_name(id))
    }

    async fn save_sub_category(&self, sub_category: &SubCategory) -> Result<(), StorageError> {
        dispatch!(self, TaxonomyStore, save_sub_category(sub_category))
    }
}

// ── PromptStore ──────────────────────────────────────────────────

#[async_trait]
impl PromptStore for StorageBackend {
    async fn insert_prompt(&self, record: &PromptRecord) -> Result<(), StorageError> {
        dispatch!(self, PromptStore, insert_prompt(record))
    }

    async fn list_prompts_for_user(&self, user_id: &str) -> Result<Vec<PromptView>, StorageError> {
        dispatch!(self, PromptStore, list_prompts_for_user(user_id))
    }
}

// ── UserStore ────────────────────────────────────────────────────

#[async_trait]
impl UserStore for StorageBackend {
    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        dispatch!(self, UserStore, save_user(user))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        dispatch!(self, UserStore, get_user(id))
    }

    async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>, StorageError> {
        dispatch!(self, UserStore, get_user_by_phone(phone))
    }

    async fn list_users(&self, query: &UserQuery) -> Result<PaginatedResult<User>, StorageError> {
        dispatch!(self, UserStore, list_users(query))
    }

    async fn delete_user(&self, id: &str) -> Result<bool, StorageError> {
        dispatch!(self, UserStore, delete_user(id))
    }
}

// ── TokenStore ───────────────────────────────────────────────────

#[async_trait]
impl TokenStore for StorageBackend {
    async fn save_token(&self, token: &AuthToken) -> Result<(), StorageError> {
        dispatch!(self, TokenStore, save_token(token))
    }

    async fn get_token(&self, token: &str) -> Result<Option<AuthToken>, StorageError> {
        dispatch!(self, TokenStore, get_token(token))
    }

    async fn delete_token(&self, token: &str) -> Result<bool, StorageError> {
        dispatch!(self, TokenStore, delete_token(token))
    }

    async fn purge_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, StorageError> {
        dispatch!(self, TokenStore, purge_expired_tokens(now))
    }
}

// ── StatsStore ───────────────────────────────────────────────────

#[async_trait]
impl StatsStore for StorageBackend {
    async fn get_platform_stats(&self, top_limit: usize) -> Result<PlatformStats, StorageError> {
        dispatch!(self, StatsStore, get_platform_stats(top_limit))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        dispatch!(self, StatsStore, ping())
    }
}
