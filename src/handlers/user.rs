use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sea_orm::*;
use tracing::instrument;

use crate::cache::ResponseCache;
use crate::entity::{self, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::{Pagination, page_params};
use crate::models::user::*;
use crate::state::AppState;
use crate::store::{self, SoftDeleteEntity};
use crate::utils::credentials;

async fn load_user(db: &DatabaseConnection, id: &str) -> Result<Option<UserResponse>, AppError> {
    Ok(store::live::<user::Entity>()
        .filter(user::Column::Id.eq(id))
        .one(db)
        .await?
        .map(UserResponse::from))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Users",
    operation_id = "registerUser",
    summary = "Register a new user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Account already taken (ACCOUNT_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(account = %payload.account))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_user(&payload)?;

    let account = payload.account.trim().to_string();

    let existing = store::live::<user::Entity>()
        .filter(user::Column::Account.eq(&account))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::AccountTaken);
    }

    let id = entity::new_id();
    let new_user = user::ActiveModel {
        id: Set(id.clone()),
        account: Set(account),
        password: Set(credentials::seal(&payload.password)),
        user_name: Set(payload.user_name.trim().to_string()),
        avatar: Set(payload.avatar),
        pk: Set(payload.pk),
        is_deleted: Set(false),
        create_user_id: Set(Some(id)),
        create_time: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_user.insert(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("registration race: unique constraint caught on insert");
            AppError::AccountTaken
        }
        _ => AppError::from(e),
    })?;

    let response = UserResponse::from(model);
    state
        .cache
        .put(&ResponseCache::key(user::Entity::KIND, &response.id), &response);

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List users with pagination",
    params(UserListQuery),
    responses((status = 200, description = "List of users", body = UserListResponse)),
)]
#[instrument(skip(state, query))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>, AppError> {
    let (page, page_size) = page_params(query.page, query.page_size);

    let result = store::page(&state.db, user::Entity::find(), None, page, page_size).await?;

    Ok(Json(UserListResponse {
        data: result.items.into_iter().map(UserResponse::from).collect(),
        pagination: Pagination::new(page, page_size, result.total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Get a user by ID",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let key = ResponseCache::key(user::Entity::KIND, &id);
    state
        .cache
        .get_or_load(&key, || load_user(&state.db, &id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Users",
    operation_id = "updateUser",
    summary = "Update the current user's profile",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not your account (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if auth_user.user_id != id {
        return Err(AppError::PermissionDenied);
    }
    validate_update_user(&payload)?;

    let existing = store::find_live::<user::Entity, _>(&state.db, &id).await?;

    if payload == UpdateUserRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: user::ActiveModel = existing.into();
    if let Some(ref name) = payload.user_name {
        active.user_name = Set(name.trim().to_string());
    }
    if let Some(avatar) = payload.avatar {
        active.avatar = Set(avatar);
    }
    if let Some(pk) = payload.pk {
        active.pk = Set(pk);
    }

    let model = active.update(&state.db).await?;

    let response = UserResponse::from(model);
    state
        .cache
        .put(&ResponseCache::key(user::Entity::KIND, &id), &response);

    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/{id}/password",
    tag = "Users",
    operation_id = "updatePassword",
    summary = "Change the current user's password",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong old password (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 403, description = "Not your account (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_password(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if auth_user.user_id != id {
        return Err(AppError::PermissionDenied);
    }
    validate_update_password(&payload)?;

    let existing = store::find_live::<user::Entity, _>(&state.db, &id).await?;

    let is_valid = credentials::verify(&payload.old_password, &existing.password)
        .unwrap_or_else(|e| {
            tracing::warn!("stored credential for user {id} unusable: {e}");
            false
        });
    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let mut active: user::ActiveModel = existing.into();
    active.password = Set(credentials::seal(&payload.new_password));
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    operation_id = "deleteUser",
    summary = "Soft-delete the current user's account",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not your account (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if auth_user.user_id != id {
        return Err(AppError::PermissionDenied);
    }

    // Self-service deletion: the ownership rule is identity, not
    // create_user_id, so this skips the owned-row lookup.
    store::mark_deleted::<user::Entity, _>(&state.db, &id, &auth_user.user_id).await?;
    state
        .cache
        .invalidate(&ResponseCache::key(user::Entity::KIND, &id));

    Ok(StatusCode::NO_CONTENT)
}
