use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sea_orm::*;
use tracing::instrument;

use crate::cache::ResponseCache;
use crate::entity::{self, blog};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::blog::*;
use crate::models::shared::{Pagination, page_params};
use crate::state::AppState;
use crate::store::{self, SoftDeleteEntity};

async fn load_blog(db: &DatabaseConnection, id: &str) -> Result<Option<BlogResponse>, AppError> {
    Ok(store::live::<blog::Entity>()
        .filter(blog::Column::Id.eq(id))
        .one(db)
        .await?
        .map(BlogResponse::from))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Blogs",
    operation_id = "createBlog",
    summary = "Create a blog post",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Blog created", body = BlogResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_blog(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_blog(&payload)?;

    let new_blog = blog::ActiveModel {
        id: Set(entity::new_id()),
        title: Set(payload.title.trim().to_string()),
        summary: Set(payload.summary.trim().to_string()),
        content: Set(payload.content),
        content_html: Set(payload.content_html),
        cover_image: Set(payload.cover_image),
        tags: Set(payload.tags),
        image_ids: Set(payload.image_ids),
        state: Set(payload.state),
        comment_count: Set(0),
        view_count: Set(0),
        is_deleted: Set(false),
        create_user_id: Set(Some(auth_user.user_id)),
        create_time: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = store::insert(&state.db, new_blog).await?;

    let response = BlogResponse::from(model);
    state
        .cache
        .put(&ResponseCache::key(blog::Entity::KIND, &response.id), &response);

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Blogs",
    operation_id = "listBlogs",
    summary = "List blog posts with pagination and filters",
    params(BlogListQuery),
    responses((status = 200, description = "List of blogs", body = BlogListResponse)),
)]
#[instrument(skip(state, query))]
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<BlogListResponse>, AppError> {
    let (page, page_size) = page_params(query.page, query.page_size);

    let mut select = blog::Entity::find();
    if let Some(ref user_id) = query.user_id {
        select = select.filter(blog::Column::CreateUserId.eq(user_id));
    }
    if let Some(ref tag) = query.tag {
        select = select.filter(blog::Column::Tags.contains(tag));
    }

    // min_views doubles as a "popular posts" mode: filter plus
    // views-descending order.
    let mut order = None;
    if let Some(min_views) = query.min_views {
        select = select.filter(blog::Column::ViewCount.gte(min_views));
        order = Some((blog::Column::ViewCount, Order::Desc));
    }

    let result = store::page(&state.db, select, order, page, page_size).await?;

    Ok(Json(BlogListResponse {
        data: result.items.into_iter().map(BlogResponse::from).collect(),
        pagination: Pagination::new(page, page_size, result.total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Blogs",
    operation_id = "getBlog",
    summary = "Get a blog post by ID",
    params(("id" = String, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Blog details", body = BlogResponse),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, AppError> {
    let key = ResponseCache::key(blog::Entity::KIND, &id);
    state
        .cache
        .get_or_load(&key, || load_blog(&state.db, &id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Blog not found".into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Blogs",
    operation_id = "updateBlog",
    summary = "Update a blog post (owner only)",
    params(("id" = String, Path, description = "Blog ID")),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Blog updated", body = BlogResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_blog(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateBlogRequest>,
) -> Result<Json<BlogResponse>, AppError> {
    validate_update_blog(&payload)?;

    let existing = store::find_owned::<blog::Entity, _>(&state.db, &id, &auth_user.user_id).await?;

    if payload == UpdateBlogRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: blog::ActiveModel = existing.into();
    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(ref summary) = payload.summary {
        active.summary = Set(summary.trim().to_string());
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(content_html) = payload.content_html {
        active.content_html = Set(content_html);
    }
    if let Some(cover_image) = payload.cover_image {
        active.cover_image = Set(cover_image);
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(tags);
    }
    if let Some(image_ids) = payload.image_ids {
        active.image_ids = Set(image_ids);
    }
    if let Some(blog_state) = payload.state {
        active.state = Set(blog_state);
    }

    let model = active.update(&state.db).await?;

    let response = BlogResponse::from(model);
    state
        .cache
        .put(&ResponseCache::key(blog::Entity::KIND, &id), &response);

    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Blogs",
    operation_id = "deleteBlog",
    summary = "Soft-delete a blog post (owner only)",
    params(("id" = String, Path, description = "Blog ID")),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_blog(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    store::soft_delete::<blog::Entity, _>(&state.db, &id, &auth_user.user_id).await?;
    state
        .cache
        .invalidate(&ResponseCache::key(blog::Entity::KIND, &id));

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/view",
    tag = "Blogs",
    operation_id = "viewBlog",
    summary = "Record one view of a blog post",
    params(("id" = String, Path, description = "Blog ID")),
    responses(
        (status = 204, description = "View recorded"),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn view_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = store::bump_counter::<blog::Entity, _>(
        &state.db,
        &id,
        blog::Column::ViewCount,
        1,
    )
    .await?;
    if !updated {
        return Err(AppError::NotFound("Blog not found".into()));
    }

    // Stale counters are evicted rather than recomputed; the next read
    // reloads from the store.
    state
        .cache
        .invalidate(&ResponseCache::key(blog::Entity::KIND, &id));

    Ok(StatusCode::NO_CONTENT)
}
