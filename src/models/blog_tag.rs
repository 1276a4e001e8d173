use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::blog_tag;
use crate::error::AppError;
use crate::models::shared::{Pagination, validate_text};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateBlogTagRequest {
    #[schema(example = "rust")]
    pub tag_name: String,
    pub sub_tag_name: String,
    /// Inline SVG or icon URL.
    pub icon: String,
    #[schema(example = "#e96900")]
    pub color: String,
}

pub fn validate_create_blog_tag(payload: &CreateBlogTagRequest) -> Result<(), AppError> {
    validate_text("Tag name", &payload.tag_name, 20)?;
    validate_text("Sub tag name", &payload.sub_tag_name, 20)?;
    validate_text("Icon", &payload.icon, 2000)?;
    validate_text("Color", &payload.color, 20)?;
    Ok(())
}

#[derive(Default, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct UpdateBlogTagRequest {
    pub tag_name: Option<String>,
    pub sub_tag_name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

pub fn validate_update_blog_tag(payload: &UpdateBlogTagRequest) -> Result<(), AppError> {
    if let Some(ref tag_name) = payload.tag_name {
        validate_text("Tag name", tag_name, 20)?;
    }
    if let Some(ref sub_tag_name) = payload.sub_tag_name {
        validate_text("Sub tag name", sub_tag_name, 20)?;
    }
    if let Some(ref icon) = payload.icon {
        validate_text("Icon", icon, 2000)?;
    }
    if let Some(ref color) = payload.color {
        validate_text("Color", color, 20)?;
    }
    Ok(())
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct BlogTagResponse {
    pub id: String,
    pub tag_name: String,
    pub sub_tag_name: String,
    pub icon: String,
    pub color: String,
    pub create_user_id: Option<String>,
    pub create_time: DateTime<Utc>,
}

impl From<blog_tag::Model> for BlogTagResponse {
    fn from(m: blog_tag::Model) -> Self {
        Self {
            id: m.id,
            tag_name: m.tag_name,
            sub_tag_name: m.sub_tag_name,
            icon: m.icon,
            color: m.color,
            create_user_id: m.create_user_id,
            create_time: m.create_time,
        }
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct BlogTagListResponse {
    pub data: Vec<BlogTagResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct BlogTagListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}
