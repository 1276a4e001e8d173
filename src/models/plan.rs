use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::plan;
use crate::error::AppError;
use crate::models::shared::{
    Pagination, double_option, validate_optional_text, validate_text,
};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePlanRequest {
    pub title: String,
    pub description: String,
    /// Markdown notes.
    pub content: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
    pub deadline: Option<DateTime<Utc>>,
}

pub fn validate_create_plan(payload: &CreatePlanRequest) -> Result<(), AppError> {
    validate_text("Title", &payload.title, 20)?;
    validate_text("Description", &payload.description, 125)?;
    validate_optional_text("Cover image", payload.cover_image.as_deref(), 300)?;
    Ok(())
}

#[derive(Default, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct UpdatePlanRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cover_image: Option<Option<String>>,
    pub is_complete: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub deadline: Option<Option<DateTime<Utc>>>,
}

pub fn validate_update_plan(payload: &UpdatePlanRequest) -> Result<(), AppError> {
    if let Some(ref title) = payload.title {
        validate_text("Title", title, 20)?;
    }
    if let Some(ref description) = payload.description {
        validate_text("Description", description, 125)?;
    }
    if let Some(Some(ref cover)) = payload.cover_image {
        validate_optional_text("Cover image", Some(cover), 300)?;
    }
    Ok(())
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlanResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub is_complete: bool,
    pub deadline: Option<DateTime<Utc>>,
    pub create_user_id: Option<String>,
    pub create_time: DateTime<Utc>,
}

impl From<plan::Model> for PlanResponse {
    fn from(m: plan::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            content: m.content,
            cover_image: m.cover_image,
            is_complete: m.is_complete,
            deadline: m.deadline,
            create_user_id: m.create_user_id,
            create_time: m.create_time,
        }
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlanListResponse {
    pub data: Vec<PlanResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct PlanListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Only plans created by this user.
    pub user_id: Option<String>,
    /// Only plans whose deadline falls within this calendar year (UTC).
    pub year: Option<i32>,
}
