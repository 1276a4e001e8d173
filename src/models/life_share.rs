use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::life_share;
use crate::error::AppError;
use crate::models::shared::{
    Pagination, double_option, validate_optional_text, validate_text,
};

pub const CATEGORIES: &[&str] = &["life", "travel", "food", "thoughts", "tech", "other"];

fn validate_category(category: &str) -> Result<(), AppError> {
    if !CATEGORIES.contains(&category) {
        return Err(AppError::Validation(format!(
            "Category must be one of: {}",
            CATEGORIES.join(", ")
        )));
    }
    Ok(())
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateLifeShareRequest {
    pub title: String,
    /// Markdown source.
    pub content: String,
    /// Cover image URL; a random default image is substituted when empty.
    pub cover_image: Option<String>,
    /// JSON array of image URLs.
    pub images: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    /// Comma-separated tag names.
    pub tags: Option<String>,
}

fn default_category() -> String {
    "life".to_string()
}

pub fn validate_create_life_share(payload: &CreateLifeShareRequest) -> Result<(), AppError> {
    validate_text("Title", &payload.title, 25)?;
    if payload.content.is_empty() {
        return Err(AppError::Validation("Content must not be empty".into()));
    }
    validate_optional_text("Cover image", payload.cover_image.as_deref(), 500)?;
    validate_optional_text("Tags", payload.tags.as_deref(), 200)?;
    validate_category(&payload.category)
}

#[derive(Default, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct UpdateLifeShareRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub cover_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub images: Option<Option<String>>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub tags: Option<Option<String>>,
}

pub fn validate_update_life_share(payload: &UpdateLifeShareRequest) -> Result<(), AppError> {
    if let Some(ref title) = payload.title {
        validate_text("Title", title, 25)?;
    }
    if let Some(ref content) = payload.content
        && content.is_empty()
    {
        return Err(AppError::Validation("Content must not be empty".into()));
    }
    if let Some(Some(ref cover)) = payload.cover_image {
        validate_optional_text("Cover image", Some(cover), 500)?;
    }
    if let Some(Some(ref tags)) = payload.tags {
        validate_optional_text("Tags", Some(tags), 200)?;
    }
    if let Some(ref category) = payload.category {
        validate_category(category)?;
    }
    Ok(())
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct LifeShareResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub images: Option<String>,
    pub category: String,
    pub tags: Option<String>,
    pub view_count: i32,
    pub like_count: i32,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub create_user_id: Option<String>,
    pub create_time: DateTime<Utc>,
}

impl From<life_share::Model> for LifeShareResponse {
    fn from(m: life_share::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            content: m.content,
            cover_image: m.cover_image,
            images: m.images,
            category: m.category,
            tags: m.tags,
            view_count: m.view_count,
            like_count: m.like_count,
            author_name: m.author_name,
            author_avatar: m.author_avatar,
            create_user_id: m.create_user_id,
            create_time: m.create_time,
        }
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct LifeShareListResponse {
    pub data: Vec<LifeShareResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct LifeShareListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Only shares created by this user.
    pub user_id: Option<String>,
    pub category: Option<String>,
    /// Only shares with at least this many views; also switches the
    /// ordering to views-descending.
    pub min_views: Option<i32>,
}
