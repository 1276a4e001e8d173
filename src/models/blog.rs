use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::blog;
use crate::error::AppError;
use crate::models::shared::{
    Pagination, double_option, validate_optional_text, validate_text,
};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateBlogRequest {
    pub title: String,
    pub summary: String,
    /// Markdown source.
    pub content: String,
    /// Pre-rendered HTML.
    pub content_html: String,
    pub cover_image: Option<String>,
    /// Comma-separated tag names.
    pub tags: String,
    pub image_ids: Option<String>,
    /// 0 = draft, 1 = published. Publishing is just creating with state 1.
    #[serde(default)]
    pub state: i32,
}

pub fn validate_create_blog(payload: &CreateBlogRequest) -> Result<(), AppError> {
    validate_text("Title", &payload.title, 20)?;
    validate_text("Summary", &payload.summary, 200)?;
    if payload.content.is_empty() {
        return Err(AppError::Validation("Content must not be empty".into()));
    }
    validate_optional_text("Cover image", payload.cover_image.as_deref(), 100)?;
    validate_optional_text("Tags", Some(&payload.tags), 100)?;
    if !(0..=1).contains(&payload.state) {
        return Err(AppError::Validation("State must be 0 or 1".into()));
    }
    Ok(())
}

#[derive(Default, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub content_html: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub cover_image: Option<Option<String>>,
    pub tags: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_ids: Option<Option<String>>,
    pub state: Option<i32>,
}

pub fn validate_update_blog(payload: &UpdateBlogRequest) -> Result<(), AppError> {
    if let Some(ref title) = payload.title {
        validate_text("Title", title, 20)?;
    }
    if let Some(ref summary) = payload.summary {
        validate_text("Summary", summary, 200)?;
    }
    if let Some(Some(ref cover)) = payload.cover_image {
        validate_optional_text("Cover image", Some(cover), 100)?;
    }
    if let Some(ref tags) = payload.tags {
        validate_optional_text("Tags", Some(tags), 100)?;
    }
    if let Some(state) = payload.state
        && !(0..=1).contains(&state)
    {
        return Err(AppError::Validation("State must be 0 or 1".into()));
    }
    Ok(())
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub content_html: String,
    pub cover_image: Option<String>,
    pub tags: String,
    pub image_ids: Option<String>,
    pub state: i32,
    pub comment_count: i32,
    pub view_count: i32,
    pub create_user_id: Option<String>,
    pub create_time: DateTime<Utc>,
}

impl From<blog::Model> for BlogResponse {
    fn from(m: blog::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            summary: m.summary,
            content: m.content,
            content_html: m.content_html,
            cover_image: m.cover_image,
            tags: m.tags,
            image_ids: m.image_ids,
            state: m.state,
            comment_count: m.comment_count,
            view_count: m.view_count,
            create_user_id: m.create_user_id,
            create_time: m.create_time,
        }
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct BlogListResponse {
    pub data: Vec<BlogResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct BlogListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Only blogs created by this user.
    pub user_id: Option<String>,
    /// Only blogs whose tag list contains this tag.
    pub tag: Option<String>,
    /// Only blogs with at least this many views; also switches the
    /// ordering to views-descending.
    pub min_views: Option<i32>,
}
