use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sea_orm::*;
use tracing::instrument;

use crate::cache::ResponseCache;
use crate::entity::{self, life_share, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, MaybeUser};
use crate::extractors::json::AppJson;
use crate::handlers::default_image::random_default_image;
use crate::models::life_share::*;
use crate::models::shared::{Pagination, page_params};
use crate::state::AppState;
use crate::store::{self, SoftDeleteEntity};

/// Fallback cover used when the default-image pool is empty.
const PLACEHOLDER_COVER: &str = "https://picsum.photos/800/600";

async fn load_share(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<LifeShareResponse>, AppError> {
    Ok(store::live::<life_share::Entity>()
        .filter(life_share::Column::Id.eq(id))
        .one(db)
        .await?
        .map(LifeShareResponse::from))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Life Shares",
    operation_id = "createLifeShare",
    summary = "Create a life share (anonymous allowed)",
    description = "Logged-in authors are snapshotted onto the record. Anonymous \
        shares persist with no owner and can never be edited or deleted.",
    request_body = CreateLifeShareRequest,
    responses(
        (status = 201, description = "Life share created", body = LifeShareResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, maybe_user, payload), fields(title = %payload.title))]
pub async fn create_life_share(
    maybe_user: MaybeUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateLifeShareRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_life_share(&payload)?;

    // Author snapshot: lists render name and avatar without a join, and
    // the snapshot survives later profile edits.
    let (create_user_id, author_name, author_avatar) = match maybe_user.0 {
        Some(auth_user) => {
            let author = store::find_live::<user::Entity, _>(&state.db, &auth_user.user_id).await?;
            (Some(author.id), Some(author.user_name), author.avatar)
        }
        None => (None, None, None),
    };

    let cover_image = match payload.cover_image.filter(|c| !c.trim().is_empty()) {
        Some(cover) => Some(cover),
        None => match random_default_image(&state.db).await? {
            Some(image) => Some(image.url),
            None => Some(PLACEHOLDER_COVER.to_string()),
        },
    };

    let new_share = life_share::ActiveModel {
        id: Set(entity::new_id()),
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        cover_image: Set(cover_image),
        images: Set(payload.images),
        category: Set(payload.category),
        tags: Set(payload.tags),
        view_count: Set(0),
        like_count: Set(0),
        author_name: Set(author_name),
        author_avatar: Set(author_avatar),
        is_deleted: Set(false),
        create_user_id: Set(create_user_id),
        create_time: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = store::insert(&state.db, new_share).await?;

    let response = LifeShareResponse::from(model);
    state.cache.put(
        &ResponseCache::key(life_share::Entity::KIND, &response.id),
        &response,
    );

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Life Shares",
    operation_id = "listLifeShares",
    summary = "List life shares with pagination and filters",
    params(LifeShareListQuery),
    responses((status = 200, description = "List of life shares", body = LifeShareListResponse)),
)]
#[instrument(skip(state, query))]
pub async fn list_life_shares(
    State(state): State<AppState>,
    Query(query): Query<LifeShareListQuery>,
) -> Result<Json<LifeShareListResponse>, AppError> {
    let (page, page_size) = page_params(query.page, query.page_size);

    let mut select = life_share::Entity::find();
    if let Some(ref user_id) = query.user_id {
        select = select.filter(life_share::Column::CreateUserId.eq(user_id));
    }
    if let Some(ref category) = query.category {
        select = select.filter(life_share::Column::Category.eq(category));
    }

    let mut order = None;
    if let Some(min_views) = query.min_views {
        select = select.filter(life_share::Column::ViewCount.gte(min_views));
        order = Some((life_share::Column::ViewCount, Order::Desc));
    }

    let result = store::page(&state.db, select, order, page, page_size).await?;

    Ok(Json(LifeShareListResponse {
        data: result
            .items
            .into_iter()
            .map(LifeShareResponse::from)
            .collect(),
        pagination: Pagination::new(page, page_size, result.total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Life Shares",
    operation_id = "getLifeShare",
    summary = "Get a life share by ID",
    params(("id" = String, Path, description = "Life share ID")),
    responses(
        (status = 200, description = "Life share details", body = LifeShareResponse),
        (status = 404, description = "Life share not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_life_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LifeShareResponse>, AppError> {
    let key = ResponseCache::key(life_share::Entity::KIND, &id);
    state
        .cache
        .get_or_load(&key, || load_share(&state.db, &id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Life share not found".into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Life Shares",
    operation_id = "updateLifeShare",
    summary = "Update a life share (owner only)",
    params(("id" = String, Path, description = "Life share ID")),
    request_body = UpdateLifeShareRequest,
    responses(
        (status = 200, description = "Life share updated", body = LifeShareResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Life share not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_life_share(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateLifeShareRequest>,
) -> Result<Json<LifeShareResponse>, AppError> {
    validate_update_life_share(&payload)?;

    let existing =
        store::find_owned::<life_share::Entity, _>(&state.db, &id, &auth_user.user_id).await?;

    if payload == UpdateLifeShareRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: life_share::ActiveModel = existing.into();
    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(cover_image) = payload.cover_image {
        active.cover_image = Set(cover_image);
    }
    if let Some(images) = payload.images {
        active.images = Set(images);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(tags);
    }

    let model = active.update(&state.db).await?;

    let response = LifeShareResponse::from(model);
    state
        .cache
        .put(&ResponseCache::key(life_share::Entity::KIND, &id), &response);

    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Life Shares",
    operation_id = "deleteLifeShare",
    summary = "Soft-delete a life share (owner only)",
    params(("id" = String, Path, description = "Life share ID")),
    responses(
        (status = 204, description = "Life share deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Life share not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_life_share(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    store::soft_delete::<life_share::Entity, _>(&state.db, &id, &auth_user.user_id).await?;
    state
        .cache
        .invalidate(&ResponseCache::key(life_share::Entity::KIND, &id));

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/view",
    tag = "Life Shares",
    operation_id = "viewLifeShare",
    summary = "Record one view of a life share",
    params(("id" = String, Path, description = "Life share ID")),
    responses(
        (status = 204, description = "View recorded"),
        (status = 404, description = "Life share not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn view_life_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = store::bump_counter::<life_share::Entity, _>(
        &state.db,
        &id,
        life_share::Column::ViewCount,
        1,
    )
    .await?;
    if !updated {
        return Err(AppError::NotFound("Life share not found".into()));
    }

    state
        .cache
        .invalidate(&ResponseCache::key(life_share::Entity::KIND, &id));

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/like",
    tag = "Life Shares",
    operation_id = "likeLifeShare",
    summary = "Like a life share",
    params(("id" = String, Path, description = "Life share ID")),
    responses(
        (status = 204, description = "Like recorded"),
        (status = 404, description = "Life share not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn like_life_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = store::bump_counter::<life_share::Entity, _>(
        &state.db,
        &id,
        life_share::Column::LikeCount,
        1,
    )
    .await?;
    if !updated {
        return Err(AppError::NotFound("Life share not found".into()));
    }

    state
        .cache
        .invalidate(&ResponseCache::key(life_share::Entity::KIND, &id));

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/{id}/like",
    tag = "Life Shares",
    operation_id = "unlikeLifeShare",
    summary = "Withdraw a like from a life share",
    params(("id" = String, Path, description = "Life share ID")),
    responses(
        (status = 204, description = "Like withdrawn (no-op at zero)"),
        (status = 404, description = "Life share not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn unlike_life_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // The decrement affects zero rows both when the record is gone and
    // when the counter already sits at zero; only the former is an error.
    store::find_live::<life_share::Entity, _>(&state.db, &id).await?;

    let updated = store::bump_counter::<life_share::Entity, _>(
        &state.db,
        &id,
        life_share::Column::LikeCount,
        -1,
    )
    .await?;

    if updated {
        state
            .cache
            .invalidate(&ResponseCache::key(life_share::Entity::KIND, &id));
    }

    Ok(StatusCode::NO_CONTENT)
}
