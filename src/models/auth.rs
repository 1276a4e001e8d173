use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for login.
///
/// Either `account` + `password`, or a bare `private_key` for
/// passwordless login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "yj")]
    pub account: String,
    #[serde(default)]
    pub password: String,
    /// Private-key token (`pk`) for passwordless login.
    #[serde(default)]
    pub private_key: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if !payload.private_key.is_empty() {
        return Ok(());
    }
    if payload.account.trim().is_empty() {
        return Err(AppError::Validation("Account must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Claims echoed back when a token verifies.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VerifyResponse {
    pub id: String,
    pub name: String,
}

/// Successful login response. The token is also set as the
/// `x-access-token` cookie.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub token: String,
    pub expires: DateTime<Utc>,
}
