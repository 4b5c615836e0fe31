//! Bearer tokens for the admin API.
//!
//! The raw token is a random 32-byte hex string shown once at creation;
//! only its SHA-256 hash is stored. Lookups go through a short-TTL cache,
//! so a revoked token may keep working for up to the cache TTL.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

/// Cache TTL for token lookups.
const CACHE_TTL: Duration = Duration::from_secs(60);

static TOKEN_CACHE: LazyLock<moka::future::Cache<String, Option<ApiToken>>> =
    LazyLock::new(|| {
        moka::future::Cache::builder()
            .time_to_live(CACHE_TTL)
            .max_capacity(1_000)
            .build()
    });

/// Stored token record; never contains the raw token.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ApiToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(skip)]
    pub token_hash: String,
    pub created: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ApiToken {
    /// Issue a token for a user. Returns `(record, raw_token)`; the raw
    /// value is never stored and cannot be recovered later.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        name: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(Self, String)> {
        let raw = generate_token();
        let token_hash = hash_token(&raw);

        let record = sqlx::query_as::<_, ApiToken>(
            r#"
            INSERT INTO api_tokens (id, user_id, name, token_hash, created, expires_at)
            VALUES ($1, $2, $3, $4, NOW(), $5)
            RETURNING id, user_id, name, token_hash, created, last_used, expires_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(name)
        .bind(&token_hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await
        .context("failed to create API token")?;

        Ok((record, raw))
    }

    /// Resolve a raw bearer value to its token record. `None` when the
    /// token is unknown or expired. Cached for [`CACHE_TTL`].
    pub async fn find_by_raw(pool: &PgPool, raw: &str) -> Result<Option<Self>> {
        let token_hash = hash_token(raw);

        if let Some(cached) = TOKEN_CACHE.get(&token_hash).await {
            return Ok(cached);
        }

        let token = sqlx::query_as::<_, ApiToken>(
            r#"
            SELECT id, user_id, name, token_hash, created, last_used, expires_at
            FROM api_tokens
            WHERE token_hash = $1
              AND (expires_at IS NULL OR expires_at > NOW())
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(pool)
        .await
        .context("failed to look up API token")?;

        TOKEN_CACHE.insert(token_hash, token.clone()).await;

        Ok(token)
    }

    /// Record that the token was just used.
    pub async fn touch_last_used(pool: &PgPool, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE api_tokens SET last_used = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to update last_used")?;

        Ok(())
    }

    /// List a user's tokens, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>> {
        let tokens = sqlx::query_as::<_, ApiToken>(
            r#"
            SELECT id, user_id, name, token_hash, created, last_used, expires_at
            FROM api_tokens WHERE user_id = $1 ORDER BY created DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("failed to list API tokens")?;

        Ok(tokens)
    }

    /// Revoke a token, scoped to its owner. Returns false when absent.
    pub async fn revoke(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM api_tokens WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await
            .context("failed to revoke API token")?;

        Ok(result.rows_affected() > 0)
    }
}

/// Generate a 32-byte random hex token.
fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// SHA-256 hash a raw token for storage.
fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic_and_distinct() {
        let a = hash_token("token-a");
        assert_eq!(a, hash_token("token-a"));
        assert_ne!(a, hash_token("token-b"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn generated_tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
