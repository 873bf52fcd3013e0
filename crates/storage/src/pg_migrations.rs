//! PostgreSQL schema bootstrap for lessonhub storage.
//!
//! Every statement is idempotent so the bootstrap runs on each startup.

use sqlx::PgPool;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sub_categories (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        category_id TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (name, category_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_sub_categories_category ON sub_categories (category_id)",
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        phone TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_users_created ON users (created_at DESC)",
    // Taxonomy ids on prompts are not foreign keys.
    r#"
    CREATE TABLE IF NOT EXISTS prompts (
        seq BIGSERIAL,
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        category_id TEXT NOT NULL,
        sub_category_id TEXT NOT NULL,
        prompt TEXT NOT NULL,
        response TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_prompts_user_created ON prompts (user_id, created_at DESC, seq DESC)",
    "CREATE INDEX IF NOT EXISTS idx_prompts_category ON prompts (category_id)",
    r#"
    CREATE TABLE IF NOT EXISTS auth_tokens (
        token TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        expires_at TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_auth_tokens_expires ON auth_tokens (expires_at)",
];

/// Run all PostgreSQL migrations.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!(statements = SCHEMA.len(), "PostgreSQL schema ensured");
    Ok(())
}
