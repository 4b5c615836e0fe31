//! Admin CMS routes: post CRUD, tag management, users, subscribers.
//!
//! Every route here sits behind the bearer-token layer; handlers can
//! assume a resolved [`AdminAuth`] in request extensions.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::content::{ContentItem, is_valid_tag_slug, map_blocks, map_post, normalize_tag, tag_to_slug};
use crate::error::{AppError, AppResult};
use crate::middleware::AdminAuth;
use crate::models::post::{KIND_POST, KIND_TUTORIAL};
use crate::models::{CreatePost, CreateTag, CreateUser, PostRow, Subscriber, TagRow, UpdatePost, User};
use crate::state::AppState;

use super::posts::{ListQuery, list_content};

/// Admin payload for creating or replacing a post.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePostRequest {
    pub title: String,
    pub description: String,
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub related_posts: Vec<String>,
    pub read_time: Option<String>,
    pub published: Option<bool>,
    #[serde(default)]
    pub blocks: Vec<Value>,
}

/// Admin payload for creating a tag. Fields are optional so that a
/// missing field is a 400, not a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Create the admin router, guarded by the bearer-token layer.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/posts", get(admin_list_posts).post(create_post))
        .route("/api/admin/posts/{id}", put(update_post).delete(delete_post))
        .route("/api/admin/posts/{id}/publish", post(toggle_publish))
        .route("/api/admin/tags", post(create_tag))
        .route("/api/admin/tags/{slug}", delete(delete_tag))
        .route("/api/admin/users", get(list_users).post(create_user))
        .route("/api/admin/subscribers", get(list_subscribers))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            crate::middleware::require_bearer,
        ))
}

/// GET /api/admin/posts — the public listing flow without any implied
/// status filter, so drafts are visible.
async fn admin_list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    list_content(&state, &query, None).await
}

/// POST /api/admin/posts
async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Json(request): Json<SavePostRequest>,
) -> AppResult<Response> {
    let (kind, slug, document) = validate_save_request(&request)?;

    if PostRow::slug_exists(state.db(), &slug).await? {
        return Err(AppError::Conflict(format!("slug {slug:?} already exists")));
    }

    let row = PostRow::create(
        state.db(),
        CreatePost {
            slug,
            kind,
            published: request.published.unwrap_or(false),
            author_id: auth.user_id,
            document,
        },
    )
    .await?;

    TagRow::refresh_counts(state.db()).await?;

    let item = map_post(&row)?;
    Ok((StatusCode::CREATED, Json(item)).into_response())
}

/// PUT /api/admin/posts/{id}
async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SavePostRequest>,
) -> AppResult<Json<ContentItem>> {
    let (kind, slug, document) = validate_save_request(&request)?;

    let current = PostRow::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    if slug != current.slug && PostRow::slug_exists(state.db(), &slug).await? {
        return Err(AppError::Conflict(format!("slug {slug:?} already exists")));
    }

    let row = PostRow::update(
        state.db(),
        id,
        UpdatePost {
            slug: Some(slug),
            kind: Some(kind),
            published: request.published,
            document: Some(document),
        },
    )
    .await?
    .ok_or(AppError::NotFound)?;

    TagRow::refresh_counts(state.db()).await?;

    Ok(Json(map_post(&row)?))
}

/// POST /api/admin/posts/{id}/publish — toggle the publication flag.
async fn toggle_publish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContentItem>> {
    let current = PostRow::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    let row = PostRow::set_published(state.db(), id, !current.published)
        .await?
        .ok_or(AppError::NotFound)?;

    TagRow::refresh_counts(state.db()).await?;

    Ok(Json(map_post(&row)?))
}

/// DELETE /api/admin/posts/{id} — soft delete.
async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    if !PostRow::soft_delete(state.db(), id).await? {
        return Err(AppError::NotFound);
    }

    TagRow::refresh_counts(state.db()).await?;

    Ok(Json(json!({ "ok": true })))
}

/// POST /api/admin/tags
///
/// 400 on missing fields or a slug outside `^[a-z0-9-]+$`; 409 when a
/// tag already exists at that slug.
async fn create_tag(
    State(state): State<AppState>,
    Json(request): Json<CreateTagRequest>,
) -> AppResult<Response> {
    let name = request
        .name
        .as_deref()
        .map(normalize_tag)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;

    let slug = request
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("slug is required".to_string()))?
        .to_string();

    if !is_valid_tag_slug(&slug) {
        return Err(AppError::BadRequest(
            "slug must match ^[a-z0-9-]+$".to_string(),
        ));
    }

    if TagRow::slug_exists(state.db(), &slug).await? {
        return Err(AppError::Conflict(format!("tag {slug:?} already exists")));
    }

    let tag = TagRow::create(
        state.db(),
        CreateTag {
            name,
            slug,
            description: request.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(tag)).into_response())
}

/// DELETE /api/admin/tags/{slug}
async fn delete_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    if !TagRow::delete_by_slug(state.db(), &slug).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "ok": true })))
}

/// GET /api/admin/users
async fn list_users(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let users = User::list(state.db()).await?;
    Ok(Json(json!({ "users": users })))
}

/// POST /api/admin/users
async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<Response> {
    if input.name.trim().is_empty() || input.mail.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::BadRequest(
            "name, mail, and password are required".to_string(),
        ));
    }

    if User::find_by_name(state.db(), &input.name).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "user {:?} already exists",
            input.name
        )));
    }
    if User::find_by_mail(state.db(), &input.mail).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "email {:?} already in use",
            input.mail
        )));
    }

    let user = User::create(state.db(), input).await?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// GET /api/admin/subscribers
async fn list_subscribers(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let subscribers = Subscriber::list(state.db()).await?;
    let total = subscribers.len();
    Ok(Json(json!({ "subscribers": subscribers, "total": total })))
}

/// Validate a save request and build the stored document.
///
/// Returns `(kind, slug, document)`. Block validation runs at write time
/// so the read path's strict mapper never sees an unrecognized tag from
/// our own editor.
fn validate_save_request(request: &SavePostRequest) -> Result<(String, String, Value), AppError> {
    let title = request.title.trim();
    let description = request.description.trim();
    if title.is_empty() || description.is_empty() {
        return Err(AppError::BadRequest(
            "title and description are required".to_string(),
        ));
    }

    let kind = request.kind.clone().unwrap_or_else(|| KIND_POST.to_string());
    if kind != KIND_POST && kind != KIND_TUTORIAL {
        return Err(AppError::BadRequest(format!(
            "type must be {KIND_POST:?} or {KIND_TUTORIAL:?}"
        )));
    }

    let slug = match request.slug.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => tag_to_slug(title),
    };
    if slug.is_empty() {
        return Err(AppError::BadRequest(
            "a slug could not be derived from the title".to_string(),
        ));
    }

    map_blocks(&request.blocks)
        .map_err(|e| AppError::BadRequest(format!("invalid content block: {e}")))?;

    let tags: Vec<String> = request
        .tags
        .iter()
        .map(|t| normalize_tag(t))
        .filter(|t| !t.is_empty())
        .collect();

    let mut document = json!({
        "title": title,
        "description": description,
        "tags": tags,
        "keywords": request.keywords,
        "relatedPosts": request.related_posts,
        "blocks": request.blocks,
    });
    if let Some(category) = request.category.as_deref().filter(|c| !c.is_empty()) {
        document["category"] = json!(category);
    }
    if let Some(level) = request.level.as_deref().filter(|l| !l.is_empty()) {
        document["level"] = json!(level);
    }
    if let Some(read_time) = request.read_time.as_deref().filter(|r| !r.is_empty()) {
        document["readTime"] = json!(read_time);
    }

    Ok((kind, slug, document))
}
