//! Public content routes: post/tutorial listings, detail, counters.
//!
//! Listings bind URL query parameters to the content query layer: fetch
//! candidate rows (optionally pre-narrowed in SQL), map them into typed
//! entities, re-apply every filter in memory, then paginate. The engine
//! re-applies filters the store already applied; both call-site styles
//! must agree on the result.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::content::{
    ContentFilter, ContentItem, SortOrder, filter_and_sort, highlight, paginate,
};
use crate::content::query::MIN_HIGHLIGHT_LEN;
use crate::error::{AppError, AppResult};
use crate::models::PostRow;
use crate::models::post::KIND_TUTORIAL;
use crate::state::AppState;

use super::helpers::{clamp_page_size, coerce_page, list_etag};

/// Query parameters for listing content.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub level: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
    /// Kept as text: stale or tampered values coerce to page 1 instead
    /// of failing extraction.
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListQuery {
    /// `page` as a number; garbage becomes `None` for the coercion step.
    pub fn page_param(&self) -> Option<i64> {
        self.page.as_deref().and_then(|s| s.parse().ok())
    }

    /// `per_page` as a number; garbage becomes `None`.
    pub fn per_page_param(&self) -> Option<i64> {
        self.per_page.as_deref().and_then(|s| s.parse().ok())
    }

    /// Build the in-memory filter, optionally forcing the kind.
    pub fn to_filter(&self, forced_kind: Option<&str>) -> ContentFilter {
        ContentFilter {
            search: self.search.clone(),
            status: self.status.clone(),
            kind: forced_kind.map(String::from).or_else(|| self.kind.clone()),
            level: self.level.clone(),
            tag: self.tag.clone(),
            sort: SortOrder::from_param(self.sort.as_deref()),
        }
    }
}

/// One entry in a listing: the entity without its block sequence.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedPost {
    pub id: Uuid,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub tags: Vec<String>,
    pub read_time: String,
    pub published: bool,
    pub created: i64,
    pub updated: i64,
    pub views: i64,
    pub likes: i64,
    /// Title with `<mark>` wrapping, present only while searching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_highlighted: Option<String>,
}

impl ListedPost {
    pub(crate) fn from_item(item: &ContentItem, search: Option<&str>) -> Self {
        let title_highlighted = search
            .filter(|term| term.trim().len() >= MIN_HIGHLIGHT_LEN)
            .map(|term| highlight(&item.title, term));

        Self {
            id: item.id,
            slug: item.slug.clone(),
            kind: item.kind.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            level: item.level.clone(),
            tags: item.tags.clone(),
            read_time: item.read_time.clone(),
            published: item.published,
            created: item.created,
            updated: item.updated,
            views: item.views,
            likes: item.likes,
            title_highlighted,
        }
    }
}

/// List response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub posts: Vec<ListedPost>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Create the public content router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/tutorials", get(list_tutorials))
        .route("/api/posts/{slug}", get(get_post))
        .route("/api/posts/{slug}/view", post(record_view))
        .route("/api/posts/{slug}/like", post(record_like))
}

/// GET /api/posts
async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    list_content(&state, &query, None).await
}

/// GET /api/tutorials — the same engine with the kind pinned.
async fn list_tutorials(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    list_content(&state, &query, Some(KIND_TUTORIAL)).await
}

/// Shared listing flow: fetch, map, filter, sort, paginate.
pub async fn list_content(
    state: &AppState,
    query: &ListQuery,
    forced_kind: Option<&str>,
) -> AppResult<Response> {
    let filter = query.to_filter(forced_kind);

    // SQL-side narrowing mirrors two of the in-memory predicates.
    let kind_hint = filter.kind.as_deref().filter(|k| !k.is_empty());
    let published_hint = filter
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| s == "published");

    let rows = PostRow::list(state.db(), kind_hint, published_hint).await?;
    let items = crate::content::map_posts(&rows)?;
    let matched = filter_and_sort(&items, &filter);

    let page = coerce_page(query.page_param());
    let per_page = clamp_page_size(query.per_page_param(), state.config().default_page_size);
    let paged = paginate(&matched, page, per_page);

    let search = filter.search.as_deref().filter(|s| !s.is_empty());
    let body = ListResponse {
        posts: paged
            .items
            .iter()
            .map(|item| ListedPost::from_item(item, search))
            .collect(),
        total: paged.total,
        page,
        per_page,
    };

    let etag = list_etag(&filter.identity(), page, per_page);

    Ok(([(header::ETAG, etag)], Json(body)).into_response())
}

/// GET /api/posts/{slug}
async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ContentItem>> {
    let row = PostRow::find_by_slug(state.db(), &slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let item = crate::content::map_post(&row)?;
    Ok(Json(item))
}

/// POST /api/posts/{slug}/view
async fn record_view(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    if !PostRow::increment_views(state.db(), &slug).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "ok": true })))
}

/// POST /api/posts/{slug}/like
async fn record_like(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    if !PostRow::increment_likes(state.db(), &slug).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn garbage_page_params_coerce_instead_of_failing() {
        let query = ListQuery {
            page: Some("abc".to_string()),
            per_page: Some("-5".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(query.page_param(), None);
        assert_eq!(query.per_page_param(), Some(-5));

        use super::super::helpers::{clamp_page_size, coerce_page};
        assert_eq!(coerce_page(query.page_param()), 1);
        assert_eq!(clamp_page_size(query.per_page_param(), 10), 10);
    }

    #[test]
    fn forced_kind_overrides_the_type_param() {
        let query = ListQuery {
            kind: Some("post".to_string()),
            ..ListQuery::default()
        };
        let filter = query.to_filter(Some(KIND_TUTORIAL));
        assert_eq!(filter.kind.as_deref(), Some("tutorial"));

        let unforced = query.to_filter(None);
        assert_eq!(unforced.kind.as_deref(), Some("post"));
    }
}
