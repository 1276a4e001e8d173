use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::TimeZone;
use sea_orm::*;
use tracing::instrument;

use crate::cache::ResponseCache;
use crate::entity::{self, plan};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::plan::*;
use crate::models::shared::{Pagination, page_params};
use crate::state::AppState;
use crate::store::{self, SoftDeleteEntity};

async fn load_plan(db: &DatabaseConnection, id: &str) -> Result<Option<PlanResponse>, AppError> {
    Ok(store::live::<plan::Entity>()
        .filter(plan::Column::Id.eq(id))
        .one(db)
        .await?
        .map(PlanResponse::from))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Plans",
    operation_id = "createPlan",
    summary = "Create a plan",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created", body = PlanResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_plan(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_plan(&payload)?;

    let new_plan = plan::ActiveModel {
        id: Set(entity::new_id()),
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        description: Set(payload.description.trim().to_string()),
        cover_image: Set(payload.cover_image),
        is_complete: Set(payload.is_complete),
        deadline: Set(payload.deadline),
        is_deleted: Set(false),
        create_user_id: Set(Some(auth_user.user_id)),
        create_time: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = store::insert(&state.db, new_plan).await?;

    let response = PlanResponse::from(model);
    state
        .cache
        .put(&ResponseCache::key(plan::Entity::KIND, &response.id), &response);

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Plans",
    operation_id = "listPlans",
    summary = "List plans with pagination and filters",
    params(PlanListQuery),
    responses(
        (status = 200, description = "List of plans", body = PlanListResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_plans(
    State(state): State<AppState>,
    Query(query): Query<PlanListQuery>,
) -> Result<Json<PlanListResponse>, AppError> {
    let (page, page_size) = page_params(query.page, query.page_size);

    let mut select = plan::Entity::find();
    if let Some(ref user_id) = query.user_id {
        select = select.filter(plan::Column::CreateUserId.eq(user_id));
    }
    if let Some(year) = query.year {
        let start = chrono::Utc
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| AppError::Validation("year is out of range".into()))?;
        let end = chrono::Utc
            .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| AppError::Validation("year is out of range".into()))?;
        select = select
            .filter(plan::Column::Deadline.gte(start))
            .filter(plan::Column::Deadline.lt(end));
    }

    let result = store::page(&state.db, select, None, page, page_size).await?;

    Ok(Json(PlanListResponse {
        data: result.items.into_iter().map(PlanResponse::from).collect(),
        pagination: Pagination::new(page, page_size, result.total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Plans",
    operation_id = "getPlan",
    summary = "Get a plan by ID",
    params(("id" = String, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan details", body = PlanResponse),
        (status = 404, description = "Plan not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlanResponse>, AppError> {
    let key = ResponseCache::key(plan::Entity::KIND, &id);
    state
        .cache
        .get_or_load(&key, || load_plan(&state.db, &id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Plan not found".into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Plans",
    operation_id = "updatePlan",
    summary = "Update a plan (owner only)",
    params(("id" = String, Path, description = "Plan ID")),
    request_body = UpdatePlanRequest,
    responses(
        (status = 200, description = "Plan updated", body = PlanResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Plan not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_plan(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdatePlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    validate_update_plan(&payload)?;

    let existing = store::find_owned::<plan::Entity, _>(&state.db, &id, &auth_user.user_id).await?;

    if payload == UpdatePlanRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: plan::ActiveModel = existing.into();
    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(ref description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(cover_image) = payload.cover_image {
        active.cover_image = Set(cover_image);
    }
    if let Some(is_complete) = payload.is_complete {
        active.is_complete = Set(is_complete);
    }
    if let Some(deadline) = payload.deadline {
        active.deadline = Set(deadline);
    }

    let model = active.update(&state.db).await?;

    let response = PlanResponse::from(model);
    state
        .cache
        .put(&ResponseCache::key(plan::Entity::KIND, &id), &response);

    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Plans",
    operation_id = "deletePlan",
    summary = "Soft-delete a plan (owner only)",
    params(("id" = String, Path, description = "Plan ID")),
    responses(
        (status = 204, description = "Plan deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Plan not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_plan(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    store::soft_delete::<plan::Entity, _>(&state.db, &id, &auth_user.user_id).await?;
    state
        .cache
        .invalidate(&ResponseCache::key(plan::Entity::KIND, &id));

    Ok(StatusCode::NO_CONTENT)
}
