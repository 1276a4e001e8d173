use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Name of the authentication cookie set at login.
pub const TOKEN_COOKIE: &str = "x-access-token";

/// Authenticated user resolved from the `x-access-token` cookie (or an
/// `Authorization: Bearer <token>` header as a fallback).
///
/// Add this as a handler parameter to require authentication.
pub struct AuthUser {
    pub user_id: String,
    pub user_name: String,
}

/// Like [`AuthUser`], but absence of a token is not an error.
///
/// Used where anonymous access is allowed (life-share creation). An
/// invalid token is still rejected; only a missing one yields `None`.
pub struct MaybeUser(pub Option<AuthUser>);

fn token_from_parts(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

fn resolve(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, AppError> {
    let Some(token) = token_from_parts(parts) else {
        return Ok(None);
    };

    let claims = jwt::verify(&token, &state.config.auth.jwt_secret)
        .map_err(|_| AppError::TokenInvalid)?;

    Ok(Some(AuthUser {
        user_id: claims.sub,
        user_name: claims.name,
    }))
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        resolve(parts, &state)?.ok_or(AppError::TokenMissing)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(MaybeUser(resolve(parts, &state)?))
    }
}
