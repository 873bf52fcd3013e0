//! Accounts, password auth and bearer tokens.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use lessonhub_core::{
    env_parse_clamped, AuthToken, Role, User, UserQuery,
    DEFAULT_PAGE_SIZE, DEFAULT_TOKEN_TTL_HOURS, MAX_PAGE_SIZE, TOKEN_TTL_RANGE_HOURS,
};
use lessonhub_storage::traits::{TokenStore, UserStore};
use lessonhub_storage::StorageBackend;
use serde::Serialize;

use crate::ServiceError;

const INVALID_CREDENTIALS: &str = "invalid phone or password";

/// Token lifetime and bcrypt work factor.
#[derive(Debug, Clone, Copy)]
pub struct AuthSettings {
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self { token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS, bcrypt_cost: bcrypt::DEFAULT_COST }
    }
}

impl AuthSettings {
    /// `LESSONHUB_TOKEN_TTL_HOURS` (clamped to 1..=8760) and
    /// `LESSONHUB_BCRYPT_COST` (clamped to 4..=31).
    #[must_use]
    pub fn from_env() -> Self {
        let (min_ttl, max_ttl) = TOKEN_TTL_RANGE_HOURS;
        let token_ttl_hours = env_parse_clamped(
            "LESSONHUB_TOKEN_TTL_HOURS",
            DEFAULT_TOKEN_TTL_HOURS,
            min_ttl,
            max_ttl,
        );
        let bcrypt_cost = env_parse_clamped("LESSONHUB_BCRYPT_COST", bcrypt::DEFAULT_COST, 4, 31);
        Self { token_ttl_hours, bcrypt_cost }
    }
}

/// A validated registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub password: String,
}

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Admin listing request, 1-based pages.
#[derive(Debug, Clone, Default)]
pub struct UserListParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

#[derive(Clone)]
pub struct UserService {
    storage: Arc<StorageBackend>,
    settings: AuthSettings,
}

impl UserService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>, settings: AuthSettings) -> Self {
        Self { storage, settings }
    }

    pub async fn register(&self, input: NewUser) -> Result<AuthSession, ServiceError> {
        // Fail before the user row exists, not after.
        self.token_expiry(Utc::now())?;
        let user = self.create_user(input, Role::User).await?;
        let token = self.issue_token(&user).await?;
        Ok(AuthSession { user, token })
    }

    /// Create an admin account. Fails if the phone is already registered.
    pub async fn create_admin(&self, input: NewUser) -> Result<User, ServiceError> {
        self.create_user(input, Role::Admin).await
    }

    async fn create_user(&self, input: NewUser, role: Role) -> Result<User, ServiceError> {
        if self.storage.get_user_by_phone(&input.phone).await?.is_some() {
            return Err(ServiceError::InvalidField {
                field: "phone",
                message: "phone number already registered".to_owned(),
            });
        }
        let password_hash = hash_password(input.password, self.settings.bcrypt_cost).await?;
        let user = User::new(
            uuid::Uuid::new_v4().to_string(),
            input.name.trim().to_owned(),
            input.phone,
            password_hash,
            role,
            Utc::now(),
        );
        self.storage.save_user(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    pub async fn login(&self, phone: &str, password: &str) -> Result<AuthSession, ServiceError> {
        let Some(user) = self.storage.get_user_by_phone(phone).await? else {
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        };
        if !verify_password(password.to_owned(), user.password_hash.clone()).await? {
            tracing::info!(user_id = %user.id, "login rejected");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        }
        let token = self.issue_token(&user).await?;
        Ok(AuthSession { user, token })
    }

    /// Resolve a bearer token to its user. Expired tokens are removed.
    pub async fn authenticate(&self, token: &str) -> Result<User, ServiceError> {
        let Some(stored) = self.storage.get_token(token).await? else {
            return Err(ServiceError::Unauthorized("invalid token".to_owned()));
        };
        if stored.is_expired(Utc::now()) {
            self.storage.delete_token(token).await?;
            return Err(ServiceError::Unauthorized("token expired".to_owned()));
        }
        self.storage
            .get_user(&stored.user_id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("invalid token".to_owned()))
    }

    pub async fn logout(&self, token: &str) -> Result<bool, ServiceError> {
        Ok(self.storage.delete_token(token).await?)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, ServiceError> {
        self.storage.get_user(id).await?.ok_or_else(|| ServiceError::not_found("user", id))
    }

    pub async fn list_users(&self, params: UserListParams) -> Result<UserPage, ServiceError> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let search = params.search.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        let query = UserQuery {
            search,
            role: params.role,
            offset: page.saturating_sub(1).saturating_mul(limit),
            limit,
        };
        let result = self.storage.list_users(&query).await?;
        let limit_u64 = u64::try_from(limit).unwrap_or(u64::MAX);
        Ok(UserPage {
            users: result.items,
            pagination: Pagination {
                page,
                limit,
                total: result.total,
                pages: result.total.div_ceil(limit_u64),
            },
        })
    }

    /// Delete a user with their prompts and tokens.
    pub async fn delete_user(&self, id: &str) -> Result<(), ServiceError> {
        if !self.storage.delete_user(id).await? {
            return Err(ServiceError::not_found("user", id));
        }
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }

    pub async fn purge_expired_tokens(&self) -> Result<usize, ServiceError> {
        let purged = self.storage.purge_expired_tokens(Utc::now()).await?;
        if purged > 0 {
            tracing::debug!(purged, "expired tokens removed");
        }
        Ok(purged)
    }

    fn token_expiry(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, ServiceError> {
        let ttl = self.settings.token_ttl_hours;
        Duration::try_hours(ttl)
            .filter(|lifetime| *lifetime > Duration::zero())
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| ServiceError::Config(format!("token lifetime of {ttl} hours is out of range")))
    }

    async fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        let now = Utc::now();
        let token = AuthToken {
            token: uuid::Uuid::new_v4().simple().to_string(),
            user_id: user.id.clone(),
            created_at: now,
            expires_at: self.token_expiry(now)?,
        };
        self.storage.save_token(&token).await?;
        Ok(token.token)
    }
}

async fn hash_password(password: String, cost: u32) -> Result<String, ServiceError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

async fn verify_password(password: String, hash: String) -> Result<bool, ServiceError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}
