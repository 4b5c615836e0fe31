//! Tag storage.
//!
//! Tags carry a display name, an optional lowercase kebab-case slug, and
//! a denormalized `post_count`. The count is refreshed by the storage
//! layer whenever posts change publication state; the query core never
//! writes it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Tag record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagRow {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Display name (e.g. "SwiftUI").
    pub name: String,

    /// URL slug; lowercase kebab-case when present.
    pub slug: Option<String>,

    /// Optional description shown on the tag page.
    pub description: Option<String>,

    /// Denormalized count of published posts carrying this tag.
    pub post_count: i64,
}

/// Input for creating a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl TagRow {
    /// Find a tag by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Self>(
            "SELECT id, name, slug, description, post_count FROM tags WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to fetch tag by slug")?;

        Ok(row)
    }

    /// List all tags ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>(
            "SELECT id, name, slug, description, post_count FROM tags ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .context("failed to list tags")?;

        Ok(rows)
    }

    /// Check whether a slug is already taken.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tags WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
            .context("failed to check tag slug existence")?;

        Ok(exists)
    }

    /// Create a new tag. The caller validates the slug grammar first.
    pub async fn create(pool: &PgPool, input: CreateTag) -> Result<Self> {
        let id = Uuid::now_v7();

        let row = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO tags (id, name, slug, description, post_count)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING id, name, slug, description, post_count
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .fetch_one(pool)
        .await
        .context("failed to create tag")?;

        Ok(row)
    }

    /// Delete a tag by slug. Returns false when absent.
    pub async fn delete_by_slug(pool: &PgPool, slug: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await
            .context("failed to delete tag")?;

        Ok(result.rows_affected() > 0)
    }

    /// Refresh every tag's denormalized post count from the live,
    /// published posts whose documents carry the tag's display name.
    pub async fn refresh_counts(pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tags t SET post_count = (
                SELECT COUNT(*) FROM posts p
                WHERE NOT p.deleted
                  AND p.published
                  AND p.document->'tags' @> jsonb_build_array(t.name)
            )
            "#,
        )
        .execute(pool)
        .await
        .context("failed to refresh tag post counts")?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn tag_serializes_with_count() {
        let tag = TagRow {
            id: Uuid::now_v7(),
            name: "SwiftUI".to_string(),
            slug: Some("swiftui".to_string()),
            description: None,
            post_count: 7,
        };

        let value = serde_json::to_value(&tag).unwrap();
        assert_eq!(value["name"], "SwiftUI");
        assert_eq!(value["post_count"], 7);
    }
}
