//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

#![allow(clippy::absolute_paths, reason = "std paths in error handling are clear")]

mod prompts;
mod stats;
mod taxonomy;
mod users;

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use lessonhub_core::{
    AuthToken, Category, PromptRecord, PromptView, Role, SubCategory, TaxonomyNames, User,
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use super::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }
}

/// Convert `usize` to `i64` for SQL LIMIT/OFFSET binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

pub(crate) fn i64_to_u64(val: i64) -> u64 {
    u64::try_from(val).unwrap_or(0)
}

pub(crate) fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

pub(crate) fn row_to_category(row: &sqlx::postgres::PgRow) -> Result<Category, StorageError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Category::new(row.try_get("id")?, row.try_get("name")?, created_at))
}

pub(crate) fn row_to_sub_category(
    row: &sqlx::postgres::PgRow,
) -> Result<SubCategory, StorageError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(SubCategory::new(
        row.try_get("id")?,
        row.try_get("name")?,
        row.try_get("category_id")?,
        created_at,
    ))
}

pub(crate) fn row_to_prompt_view(row: &sqlx::postgres::PgRow) -> Result<PromptView, StorageError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let record = PromptRecord::new(
        row.try_get("id")?,
        row.try_get("user_id")?,
        row.try_get("category_id")?,
        row.try_get("sub_category_id")?,
        row.try_get("prompt")?,
        row.try_get("response")?,
        created_at,
    );
    let names = TaxonomyNames::resolve(
        row.try_get("category_name")?,
        row.try_get("sub_category_name")?,
    );
    Ok(PromptView::new(record, names))
}

pub(crate) fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, StorageError> {
    let role_str: String = row.try_get("role")?;
    let role: Role = role_str.parse().map_err(|e| StorageError::DataCorruption {
        context: format!("users.role = '{role_str}'"),
        source: Box::new(e),
    })?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(User::new(
        row.try_get("id")?,
        row.try_get("name")?,
        row.try_get("phone")?,
        row.try_get("password_hash")?,
        role,
        created_at,
    ))
}

pub(crate) fn row_to_token(row: &sqlx::postgres::PgRow) -> Result<AuthToken, StorageError> {
    Ok(AuthToken {
        token: row.try_get("token")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        expires_at: row.try_get("expires_at")?,
    })
}

pub(crate) const USER_COLUMNS: &str = "id, name, phone, password_hash, role, created_at";

pub(crate) const PROMPT_VIEW_SELECT: &str =
    "SELECT p.id, p.user_id, p.category_id, p.sub_category_id, p.prompt, p.response,
            p.created_at, c.name AS category_name, s.name AS sub_category_name
       FROM prompts p
       LEFT JOIN categories c ON c.id = p.category_id
       LEFT JOIN sub_categories s ON s.id = p.sub_category_id";
