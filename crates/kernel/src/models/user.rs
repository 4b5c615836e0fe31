//! User model: authors and admins.

use anyhow::{Context, Result};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User record. The password hash never serializes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub mail: String,
    #[serde(skip_serializing)]
    pub pass: String,
    pub is_admin: bool,
    /// 1 = active, 0 = blocked.
    pub status: i16,
    pub created: DateTime<Utc>,
}

/// Input for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub mail: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Find a user by name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, mail, pass, is_admin, status, created FROM users WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user by name")?;

        Ok(user)
    }

    /// Find a user by email.
    pub async fn find_by_mail(pool: &PgPool, mail: &str) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, mail, pass, is_admin, status, created FROM users WHERE mail = $1",
        )
        .bind(mail)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user by mail")?;

        Ok(user)
    }

    /// List all users, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, mail, pass, is_admin, status, created FROM users ORDER BY created DESC",
        )
        .fetch_all(pool)
        .await
        .context("failed to list users")?;

        Ok(users)
    }

    /// Create a new active user with an argon2-hashed password.
    pub async fn create(pool: &PgPool, input: CreateUser) -> Result<Self> {
        let id = Uuid::now_v7();
        let pass = hash_password(&input.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, mail, pass, is_admin, status, created)
            VALUES ($1, $2, $3, $4, $5, 1, NOW())
            RETURNING id, name, mail, pass, is_admin, status, created
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.mail)
        .bind(&pass)
        .bind(input.is_admin)
        .fetch_one(pool)
        .await
        .context("failed to create user")?;

        Ok(user)
    }
}

/// Hash a password with argon2id and a random salt.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_serializes() {
        let user = User {
            id: Uuid::now_v7(),
            name: "maya".to_string(),
            mail: "maya@example.com".to_string(),
            pass: "$argon2id$secret".to_string(),
            is_admin: true,
            status: 1,
            created: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("maya@example.com"));
    }

    #[test]
    fn hashing_salts_each_password() {
        let a = hash_password("correct horse").unwrap();
        let b = hash_password("correct horse").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
    }
}
