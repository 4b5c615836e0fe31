//! Newsletter subscribers.
//!
//! Subscribing is a single insert; a duplicate email is absorbed rather
//! than reported as an error.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Newsletter subscriber record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscriber {
    pub id: Uuid,
    pub mail: String,
    pub created: DateTime<Utc>,
}

impl Subscriber {
    /// Subscribe an email address. Returns true when a new row was
    /// inserted, false when the address was already subscribed.
    pub async fn subscribe(pool: &PgPool, mail: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO subscribers (id, mail, created)
            VALUES ($1, $2, NOW())
            ON CONFLICT (mail) DO NOTHING
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(mail)
        .execute(pool)
        .await
        .context("failed to subscribe")?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a subscription. Returns false when the address was not
    /// subscribed.
    pub async fn unsubscribe(pool: &PgPool, mail: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subscribers WHERE mail = $1")
            .bind(mail)
            .execute(pool)
            .await
            .context("failed to unsubscribe")?;

        Ok(result.rows_affected() > 0)
    }

    /// List all subscribers, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>(
            "SELECT id, mail, created FROM subscribers ORDER BY created DESC",
        )
        .fetch_all(pool)
        .await
        .context("failed to list subscribers")?;

        Ok(rows)
    }
}
