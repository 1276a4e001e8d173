use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::default_image;
use crate::error::AppError;
use crate::models::shared::{Pagination, validate_text};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateDefaultImageRequest {
    pub url: String,
}

pub fn validate_create_default_image(
    payload: &CreateDefaultImageRequest,
) -> Result<(), AppError> {
    validate_text("Image URL", &payload.url, 500)
}

#[derive(Default, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct UpdateDefaultImageRequest {
    pub url: Option<String>,
}

pub fn validate_update_default_image(
    payload: &UpdateDefaultImageRequest,
) -> Result<(), AppError> {
    if let Some(ref url) = payload.url {
        validate_text("Image URL", url, 500)?;
    }
    Ok(())
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DefaultImageResponse {
    pub id: String,
    pub url: String,
    pub create_time: DateTime<Utc>,
}

impl From<default_image::Model> for DefaultImageResponse {
    fn from(m: default_image::Model) -> Self {
        Self {
            id: m.id,
            url: m.url,
            create_time: m.create_time,
        }
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DefaultImageListResponse {
    pub data: Vec<DefaultImageResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct DefaultImageListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}
