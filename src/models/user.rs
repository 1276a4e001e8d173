use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::AppError;
use crate::models::shared::{
    Pagination, double_option, validate_optional_text, validate_text,
};

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    /// Unique account name (1-32 chars, no whitespace).
    #[schema(example = "yj")]
    pub account: String,
    /// Password (6-128 characters).
    pub password: String,
    /// Display name.
    pub user_name: String,
    pub avatar: Option<String>,
    /// Optional private-key token for passwordless login.
    pub pk: Option<String>,
}

pub fn validate_create_user(payload: &CreateUserRequest) -> Result<(), AppError> {
    let account = payload.account.trim();
    if account.is_empty() || account.chars().count() > 32 {
        return Err(AppError::Validation("Account must be 1-32 characters".into()));
    }
    if account.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "Account must not contain whitespace".into(),
        ));
    }
    if payload.password.len() < 6 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 6-128 characters".into(),
        ));
    }
    validate_text("Display name", &payload.user_name, 50)?;
    validate_optional_text("Avatar", payload.avatar.as_deref(), 300)?;
    Ok(())
}

/// PATCH body for a user profile. Password changes go through the
/// dedicated password endpoint.
#[derive(Default, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub pk: Option<Option<String>>,
}

pub fn validate_update_user(payload: &UpdateUserRequest) -> Result<(), AppError> {
    if let Some(ref name) = payload.user_name {
        validate_text("Display name", name, 50)?;
    }
    if let Some(Some(ref avatar)) = payload.avatar {
        validate_optional_text("Avatar", Some(avatar), 300)?;
    }
    Ok(())
}

/// Request body for a password change.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

pub fn validate_update_password(payload: &UpdatePasswordRequest) -> Result<(), AppError> {
    if payload.new_password.len() < 6 || payload.new_password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 6-128 characters".into(),
        ));
    }
    Ok(())
}

/// External projection of a user. The stored credential and the private
/// key never leave the service.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub account: String,
    pub user_name: String,
    pub avatar: Option<String>,
    pub create_time: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            account: m.account,
            user_name: m.user_name,
            avatar: m.avatar,
            create_time: m.create_time,
        }
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct UserListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}
