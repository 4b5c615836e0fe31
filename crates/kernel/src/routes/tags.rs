//! Public tag routes.
//!
//! A tag page is addressed by slug. When no tag record exists for the
//! slug, the display name is recovered with the best-effort slug inverse
//! and posts are matched against that derived name.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Serialize;
use uuid::Uuid;

use crate::content::{ContentFilter, filter_and_sort, is_valid_tag_slug, slug_to_tag};
use crate::error::{AppError, AppResult};
use crate::models::{PostRow, TagRow};
use crate::state::AppState;

use super::posts::{ListQuery, ListedPost};

/// Tag as serialized on the public API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub post_count: i64,
}

impl TagResponse {
    fn from_row(row: TagRow) -> Self {
        Self {
            id: Some(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            post_count: row.post_count,
        }
    }
}

/// Tag list response body.
#[derive(Debug, Serialize)]
pub struct TagListResponse {
    pub tags: Vec<TagResponse>,
}

/// Tag detail response body: the tag plus its published posts.
#[derive(Debug, Serialize)]
pub struct TagDetailResponse {
    pub tag: TagResponse,
    pub posts: Vec<ListedPost>,
}

/// Create the public tag router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tags", get(list_tags))
        .route("/api/tags/{slug}", get(get_tag))
}

/// GET /api/tags
async fn list_tags(State(state): State<AppState>) -> AppResult<Json<TagListResponse>> {
    let tags = TagRow::list(state.db())
        .await?
        .into_iter()
        .map(TagResponse::from_row)
        .collect();

    Ok(Json(TagListResponse { tags }))
}

/// GET /api/tags/{slug}
async fn get_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<TagDetailResponse>> {
    if !is_valid_tag_slug(&slug) {
        return Err(AppError::NotFound);
    }

    // A tag page works even without a stored tag record.
    let stored = TagRow::find_by_slug(state.db(), &slug).await?;
    let display_name = stored
        .as_ref()
        .map(|t| t.name.clone())
        .unwrap_or_else(|| slug_to_tag(&slug));

    let rows = PostRow::list(state.db(), None, Some(true)).await?;
    let items = crate::content::map_posts(&rows)?;

    let filter = ContentFilter {
        status: Some("published".to_string()),
        tag: Some(display_name.clone()),
        search: query.search.clone(),
        ..ContentFilter::default()
    };
    let matched = filter_and_sort(&items, &filter);

    let posts = matched
        .iter()
        .map(|item| ListedPost::from_item(item, None))
        .collect();

    let tag = match stored {
        Some(row) => TagResponse::from_row(row),
        None => TagResponse {
            id: None,
            name: display_name,
            slug: Some(slug),
            description: None,
            post_count: matched.len() as i64,
        },
    };

    Ok(Json(TagDetailResponse { tag, posts }))
}
