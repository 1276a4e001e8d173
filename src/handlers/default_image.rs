use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rand::Rng;
use sea_orm::*;
use tracing::instrument;

use crate::cache::ResponseCache;
use crate::entity::{self, default_image};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::default_image::*;
use crate::models::shared::{Pagination, page_params};
use crate::state::AppState;
use crate::store::{self, SoftDeleteEntity};

async fn load_image(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<DefaultImageResponse>, AppError> {
    Ok(store::live::<default_image::Entity>()
        .filter(default_image::Column::Id.eq(id))
        .one(db)
        .await?
        .map(DefaultImageResponse::from))
}

/// Pick one live default image uniformly at random. `None` when the pool
/// is empty.
pub async fn random_default_image(
    db: &DatabaseConnection,
) -> Result<Option<default_image::Model>, AppError> {
    let total = store::live::<default_image::Entity>().count(db).await?;
    if total == 0 {
        return Ok(None);
    }
    let offset = rand::rng().random_range(0..total);

    Ok(store::live::<default_image::Entity>()
        .order_by_asc(default_image::Column::Id)
        .offset(Some(offset))
        .one(db)
        .await?)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Default Images",
    operation_id = "createDefaultImage",
    summary = "Add an image to the default cover pool",
    request_body = CreateDefaultImageRequest,
    responses(
        (status = 201, description = "Image added", body = DefaultImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_default_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateDefaultImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_default_image(&payload)?;

    let new_image = default_image::ActiveModel {
        id: Set(entity::new_id()),
        url: Set(payload.url.trim().to_string()),
        is_deleted: Set(false),
        create_user_id: Set(Some(auth_user.user_id)),
        create_time: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = store::insert(&state.db, new_image).await?;

    let response = DefaultImageResponse::from(model);
    state.cache.put(
        &ResponseCache::key(default_image::Entity::KIND, &response.id),
        &response,
    );

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Default Images",
    operation_id = "listDefaultImages",
    summary = "List default cover images",
    params(DefaultImageListQuery),
    responses((status = 200, description = "List of images", body = DefaultImageListResponse)),
)]
#[instrument(skip(state, query))]
pub async fn list_default_images(
    State(state): State<AppState>,
    Query(query): Query<DefaultImageListQuery>,
) -> Result<Json<DefaultImageListResponse>, AppError> {
    let (page, page_size) = page_params(query.page, query.page_size);

    let result = store::page(
        &state.db,
        default_image::Entity::find(),
        None,
        page,
        page_size,
    )
    .await?;

    Ok(Json(DefaultImageListResponse {
        data: result
            .items
            .into_iter()
            .map(DefaultImageResponse::from)
            .collect(),
        pagination: Pagination::new(page, page_size, result.total),
    }))
}

#[utoipa::path(
    get,
    path = "/random",
    tag = "Default Images",
    operation_id = "randomDefaultImage",
    summary = "Get a random default cover image",
    responses(
        (status = 200, description = "A random image", body = DefaultImageResponse),
        (status = 404, description = "The pool is empty (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_random_default_image(
    State(state): State<AppState>,
) -> Result<Json<DefaultImageResponse>, AppError> {
    random_default_image(&state.db)
        .await?
        .map(|m| Json(DefaultImageResponse::from(m)))
        .ok_or_else(|| AppError::NotFound("No default images available".into()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Default Images",
    operation_id = "getDefaultImage",
    summary = "Get a default image by ID",
    params(("id" = String, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image details", body = DefaultImageResponse),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_default_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DefaultImageResponse>, AppError> {
    let key = ResponseCache::key(default_image::Entity::KIND, &id);
    state
        .cache
        .get_or_load(&key, || load_image(&state.db, &id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Default image not found".into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Default Images",
    operation_id = "updateDefaultImage",
    summary = "Update a default image (owner only)",
    params(("id" = String, Path, description = "Image ID")),
    request_body = UpdateDefaultImageRequest,
    responses(
        (status = 200, description = "Image updated", body = DefaultImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_default_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateDefaultImageRequest>,
) -> Result<Json<DefaultImageResponse>, AppError> {
    validate_update_default_image(&payload)?;

    let existing =
        store::find_owned::<default_image::Entity, _>(&state.db, &id, &auth_user.user_id).await?;

    if payload == UpdateDefaultImageRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: default_image::ActiveModel = existing.into();
    if let Some(ref url) = payload.url {
        active.url = Set(url.trim().to_string());
    }

    let model = active.update(&state.db).await?;

    let response = DefaultImageResponse::from(model);
    state.cache.put(
        &ResponseCache::key(default_image::Entity::KIND, &id),
        &response,
    );

    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Default Images",
    operation_id = "deleteDefaultImage",
    summary = "Soft-delete a default image (owner only)",
    params(("id" = String, Path, description = "Image ID")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_default_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    store::soft_delete::<default_image::Entity, _>(&state.db, &id, &auth_user.user_id).await?;
    state
        .cache
        .invalidate(&ResponseCache::key(default_image::Entity::KIND, &id));

    Ok(StatusCode::NO_CONTENT)
}
