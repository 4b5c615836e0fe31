//! Database connection pool and schema bootstrap.

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// Create a PostgreSQL connection pool.
pub async fn create_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    Ok(pool)
}

/// Create the schema if it does not exist yet. Idempotent; runs at
/// every startup.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    let ddl = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            mail TEXT NOT NULL UNIQUE,
            pass TEXT NOT NULL,
            is_admin BOOLEAN NOT NULL DEFAULT false,
            status SMALLINT NOT NULL DEFAULT 1,
            created TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id UUID PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            kind TEXT NOT NULL,
            published BOOLEAN NOT NULL DEFAULT false,
            deleted BOOLEAN NOT NULL DEFAULT false,
            created BIGINT NOT NULL,
            updated BIGINT NOT NULL,
            views BIGINT NOT NULL DEFAULT 0,
            likes BIGINT NOT NULL DEFAULT 0,
            author_id UUID NOT NULL REFERENCES users(id),
            document JSONB NOT NULL DEFAULT '{}'::jsonb
        )
        "#,
        "CREATE INDEX IF NOT EXISTS posts_kind_published ON posts (kind, published) WHERE NOT deleted",
        "CREATE INDEX IF NOT EXISTS posts_updated ON posts (updated DESC)",
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT UNIQUE,
            description TEXT,
            post_count BIGINT NOT NULL DEFAULT 0
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS subscribers (
            id UUID PRIMARY KEY,
            mail TEXT NOT NULL UNIQUE,
            created TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS api_tokens (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            token_hash TEXT NOT NULL UNIQUE,
            created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            last_used TIMESTAMPTZ,
            expires_at TIMESTAMPTZ
        )
        "#,
    ];

    for statement in ddl {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("failed to run schema DDL")?;
    }

    Ok(())
}

/// Check if the database connection is healthy.
pub async fn check_health(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
