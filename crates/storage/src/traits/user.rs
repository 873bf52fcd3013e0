use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lessonhub_core::{AuthToken, User, UserQuery};

use crate::error::StorageError;
use crate::types::PaginatedResult;

/// User account operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with `Duplicate` if the phone is taken.
    async fn save_user(&self, user: &User) -> Result<(), StorageError>;

    /// Get user by ID.
    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError>;

    /// Get user by phone number.
    async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>, StorageError>;

    /// Filtered listing, newest users first.
    async fn list_users(&self, query: &UserQuery) -> Result<PaginatedResult<User>, StorageError>;

    /// Delete a user together with their prompts and tokens.
    /// Returns `false` if no such user existed.
    async fn delete_user(&self, id: &str) -> Result<bool, StorageError>;
}

/// Bearer token operations.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist an issued token.
    async fn save_token(&self, token: &AuthToken) -> Result<(), StorageError>;

    /// Look up a token (expired tokens included; callers check expiry).
    async fn get_token(&self, token: &str) -> Result<Option<AuthToken>, StorageError>;

    /// Revoke a token. Returns `false` if it did not exist.
    async fn delete_token(&self, token: &str) -> Result<bool, StorageError>;

    /// Remove tokens that expired before `now`.
    async fn purge_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, StorageError>;
}
