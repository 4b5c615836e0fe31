//! Post storage: the content document collection.
//!
//! A row keeps the raw content record in a JSONB `document` column plus a
//! few denormalized scalars (`kind`, `published`, `updated`, counters)
//! used for server-side filtering and ordering. Rows are soft-deleted:
//! `deleted = true` removes them from every listing and lookup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Content kind stored in the `kind` column.
pub const KIND_POST: &str = "post";
/// Content kind stored in the `kind` column.
pub const KIND_TUTORIAL: &str = "tutorial";

const SELECT_COLUMNS: &str =
    "id, slug, kind, published, deleted, created, updated, views, likes, author_id, document";

/// Stored post row. `document` is the raw, loosely-typed content record;
/// the content mapper turns the row into a typed entity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostRow {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// URL slug, unique across all rows.
    pub slug: String,

    /// `"post"` or `"tutorial"`.
    pub kind: String,

    /// Publication flag.
    pub published: bool,

    /// Soft-delete flag.
    pub deleted: bool,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub updated: i64,

    /// View counter.
    pub views: i64,

    /// Like counter.
    pub likes: i64,

    /// Author user ID.
    pub author_id: Uuid,

    /// Raw content record (JSONB).
    pub document: serde_json::Value,
}

/// Input for creating a new post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub slug: String,
    pub kind: String,
    pub published: bool,
    pub author_id: Uuid,
    pub document: serde_json::Value,
}

/// Input for updating a post. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub slug: Option<String>,
    pub kind: Option<String>,
    pub published: Option<bool>,
    pub document: Option<serde_json::Value>,
}

impl PostRow {
    /// Find a live post by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Self>(&format!(
            "SELECT {SELECT_COLUMNS} FROM posts WHERE id = $1 AND NOT deleted"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch post by id")?;

        Ok(row)
    }

    /// Find a live post by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Self>(&format!(
            "SELECT {SELECT_COLUMNS} FROM posts WHERE slug = $1 AND NOT deleted"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to fetch post by slug")?;

        Ok(row)
    }

    /// Check whether a slug is already taken (deleted rows included, since
    /// the unique index still holds their slug).
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
            .context("failed to check slug existence")?;

        Ok(exists)
    }

    /// List live posts, optionally pre-filtered by kind and publication
    /// state, newest first. Listing call sites re-apply their filters
    /// in memory; the SQL filters only narrow what gets fetched.
    pub async fn list(
        pool: &PgPool,
        kind: Option<&str>,
        published: Option<bool>,
    ) -> Result<Vec<Self>> {
        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM posts WHERE NOT deleted");
        let mut param_idx = 1;

        if kind.is_some() {
            sql.push_str(&format!(" AND kind = ${param_idx}"));
            param_idx += 1;
        }
        if published.is_some() {
            sql.push_str(&format!(" AND published = ${param_idx}"));
        }
        sql.push_str(" ORDER BY updated DESC");

        let mut query = sqlx::query_as::<_, Self>(&sql);
        if let Some(k) = kind {
            query = query.bind(k);
        }
        if let Some(p) = published {
            query = query.bind(p);
        }

        let rows = query
            .fetch_all(pool)
            .await
            .context("failed to list posts")?;

        Ok(rows)
    }

    /// Create a new post.
    pub async fn create(pool: &PgPool, input: CreatePost) -> Result<Self> {
        let now = chrono::Utc::now().timestamp();
        let id = Uuid::now_v7();

        let row = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO posts (id, slug, kind, published, deleted, created, updated, views, likes, author_id, document)
            VALUES ($1, $2, $3, $4, false, $5, $5, 0, 0, $6, $7)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.slug)
        .bind(&input.kind)
        .bind(input.published)
        .bind(now)
        .bind(input.author_id)
        .bind(&input.document)
        .fetch_one(pool)
        .await
        .context("failed to create post")?;

        Ok(row)
    }

    /// Update a post, merging absent fields from the current row and
    /// bumping `updated`.
    pub async fn update(pool: &PgPool, id: Uuid, input: UpdatePost) -> Result<Option<Self>> {
        let Some(current) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let slug = input.slug.unwrap_or(current.slug);
        let kind = input.kind.unwrap_or(current.kind);
        let published = input.published.unwrap_or(current.published);
        let document = input.document.unwrap_or(current.document);

        let row = sqlx::query_as::<_, Self>(&format!(
            r#"
            UPDATE posts
            SET slug = $1, kind = $2, published = $3, document = $4, updated = $5
            WHERE id = $6 AND NOT deleted
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(&slug)
        .bind(&kind)
        .bind(published)
        .bind(&document)
        .bind(now)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to update post")?;

        Ok(row)
    }

    /// Set the publication flag, bumping `updated`.
    pub async fn set_published(pool: &PgPool, id: Uuid, published: bool) -> Result<Option<Self>> {
        let now = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, Self>(&format!(
            r#"
            UPDATE posts SET published = $1, updated = $2
            WHERE id = $3 AND NOT deleted
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(published)
        .bind(now)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to toggle publication")?;

        Ok(row)
    }

    /// Soft-delete a post. Returns false when no live row matched.
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE posts SET deleted = true WHERE id = $1 AND NOT deleted")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to soft-delete post")?;

        Ok(result.rows_affected() > 0)
    }

    /// Atomically increment the view counter. Returns false when absent.
    pub async fn increment_views(pool: &PgPool, slug: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE posts SET views = views + 1 WHERE slug = $1 AND NOT deleted")
                .bind(slug)
                .execute(pool)
                .await
                .context("failed to increment views")?;

        Ok(result.rows_affected() > 0)
    }

    /// Atomically increment the like counter. Returns false when absent.
    pub async fn increment_likes(pool: &PgPool, slug: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE posts SET likes = likes + 1 WHERE slug = $1 AND NOT deleted")
                .bind(slug)
                .execute(pool)
                .await
                .context("failed to increment likes")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn row_shape_round_trips_through_serde() {
        let row = PostRow {
            id: Uuid::now_v7(),
            slug: "swift-actors".to_string(),
            kind: KIND_POST.to_string(),
            published: true,
            deleted: false,
            created: 1,
            updated: 2,
            views: 0,
            likes: 0,
            author_id: Uuid::nil(),
            document: serde_json::json!({"title": "Actors"}),
        };

        let json = serde_json::to_string(&row).unwrap();
        let back: PostRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.slug, "swift-actors");
        assert_eq!(back.document["title"], "Actors");
    }

    #[test]
    fn create_input_deserializes() {
        let input: CreatePost = serde_json::from_value(serde_json::json!({
            "slug": "swiftui-nav",
            "kind": "tutorial",
            "published": false,
            "author_id": Uuid::nil(),
            "document": {"title": "Navigation"}
        }))
        .unwrap();

        assert_eq!(input.kind, KIND_TUTORIAL);
        assert!(!input.published);
    }
}
