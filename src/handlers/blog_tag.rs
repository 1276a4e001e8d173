use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sea_orm::*;
use tracing::instrument;

use crate::cache::ResponseCache;
use crate::entity::{self, blog_tag};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::blog_tag::*;
use crate::models::shared::{Pagination, page_params};
use crate::state::AppState;
use crate::store::{self, SoftDeleteEntity};

async fn load_tag(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<BlogTagResponse>, AppError> {
    Ok(store::live::<blog_tag::Entity>()
        .filter(blog_tag::Column::Id.eq(id))
        .one(db)
        .await?
        .map(BlogTagResponse::from))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Blog Tags",
    operation_id = "createBlogTag",
    summary = "Create a blog tag",
    request_body = CreateBlogTagRequest,
    responses(
        (status = 201, description = "Tag created", body = BlogTagResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(tag_name = %payload.tag_name))]
pub async fn create_blog_tag(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBlogTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_blog_tag(&payload)?;

    let new_tag = blog_tag::ActiveModel {
        id: Set(entity::new_id()),
        tag_name: Set(payload.tag_name.trim().to_string()),
        sub_tag_name: Set(payload.sub_tag_name.trim().to_string()),
        icon: Set(payload.icon),
        color: Set(payload.color.trim().to_string()),
        is_deleted: Set(false),
        create_user_id: Set(Some(auth_user.user_id)),
        create_time: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = store::insert(&state.db, new_tag).await?;

    let response = BlogTagResponse::from(model);
    state.cache.put(
        &ResponseCache::key(blog_tag::Entity::KIND, &response.id),
        &response,
    );

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Blog Tags",
    operation_id = "listBlogTags",
    summary = "List blog tags with pagination",
    params(BlogTagListQuery),
    responses((status = 200, description = "List of tags", body = BlogTagListResponse)),
)]
#[instrument(skip(state, query))]
pub async fn list_blog_tags(
    State(state): State<AppState>,
    Query(query): Query<BlogTagListQuery>,
) -> Result<Json<BlogTagListResponse>, AppError> {
    let (page, page_size) = page_params(query.page, query.page_size);

    let result = store::page(&state.db, blog_tag::Entity::find(), None, page, page_size).await?;

    Ok(Json(BlogTagListResponse {
        data: result.items.into_iter().map(BlogTagResponse::from).collect(),
        pagination: Pagination::new(page, page_size, result.total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Blog Tags",
    operation_id = "getBlogTag",
    summary = "Get a blog tag by ID",
    params(("id" = String, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag details", body = BlogTagResponse),
        (status = 404, description = "Tag not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_blog_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogTagResponse>, AppError> {
    let key = ResponseCache::key(blog_tag::Entity::KIND, &id);
    state
        .cache
        .get_or_load(&key, || load_tag(&state.db, &id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Blog tag not found".into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Blog Tags",
    operation_id = "updateBlogTag",
    summary = "Update a blog tag (owner only)",
    params(("id" = String, Path, description = "Tag ID")),
    request_body = UpdateBlogTagRequest,
    responses(
        (status = 200, description = "Tag updated", body = BlogTagResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Tag not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_blog_tag(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateBlogTagRequest>,
) -> Result<Json<BlogTagResponse>, AppError> {
    validate_update_blog_tag(&payload)?;

    let existing =
        store::find_owned::<blog_tag::Entity, _>(&state.db, &id, &auth_user.user_id).await?;

    if payload == UpdateBlogTagRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: blog_tag::ActiveModel = existing.into();
    if let Some(ref tag_name) = payload.tag_name {
        active.tag_name = Set(tag_name.trim().to_string());
    }
    if let Some(ref sub_tag_name) = payload.sub_tag_name {
        active.sub_tag_name = Set(sub_tag_name.trim().to_string());
    }
    if let Some(icon) = payload.icon {
        active.icon = Set(icon);
    }
    if let Some(ref color) = payload.color {
        active.color = Set(color.trim().to_string());
    }

    let model = active.update(&state.db).await?;

    let response = BlogTagResponse::from(model);
    state
        .cache
        .put(&ResponseCache::key(blog_tag::Entity::KIND, &id), &response);

    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Blog Tags",
    operation_id = "deleteBlogTag",
    summary = "Soft-delete a blog tag (owner only)",
    params(("id" = String, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Tag not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_blog_tag(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    store::soft_delete::<blog_tag::Entity, _>(&state.db, &id, &auth_user.user_id).await?;
    state
        .cache
        .invalidate(&ResponseCache::key(blog_tag::Entity::KIND, &id));

    Ok(StatusCode::NO_CONTENT)
}
