//! UserStore and TokenStore implementations for PgStorage.

use super::*;

use crate::traits::{TokenStore, UserStore};
use crate::types::PaginatedResult;
use async_trait::async_trait;
use lessonhub_core::UserQuery;

#[async_trait]
impl UserStore for PgStorage {
    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO users (id, name, phone, password_hash, role, created_at)
               VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>, StorageError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE phone = $1");
        let row = sqlx::query(&sql).bind(phone).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn list_users(&self, query: &UserQuery) -> Result<PaginatedResult<User>, StorageError> {
        let pattern = query.search.as_deref().map(|s| format!("%{}%", escape_like(s)));
        let role = query.role.map(|r| r.as_str());
        let filter = "($1::text IS NULL OR name ILIKE $1 OR phone ILIKE $1)
                      AND ($2::text IS NULL OR role = $2)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {filter}"))
            .bind(pattern.as_deref())
            .bind(role)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {filter}
              ORDER BY created_at DESC, id ASC LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query(&sql)
            .bind(pattern.as_deref())
            .bind(role)
            .bind(usize_to_i64(query.limit))
            .bind(usize_to_i64(query.offset))
            .fetch_all(&self.pool)
            .await?;
        let items = rows.iter().map(row_to_user).collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResult {
            items,
            total: i64_to_u64(total),
            offset: u64::try_from(query.offset).unwrap_or(0),
            limit: u64::try_from(query.limit).unwrap_or(0),
        })
    }

    async fn delete_user(&self, id: &str) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM prompts WHERE user_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM auth_tokens WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl TokenStore for PgStorage {
    async fn save_token(&self, token: &AuthToken) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO auth_tokens (token, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&token.token)
        .bind(&token.user_id)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_token(&self, token: &str) -> Result<Option<AuthToken>, StorageError> {
        let row = sqlx::query(
            "SELECT token, user_id, created_at, expires_at FROM auth_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_token).transpose()
    }

    async fn delete_token(&self, token: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, StorageError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }
}
