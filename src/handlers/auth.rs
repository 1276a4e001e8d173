use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, TOKEN_COOKIE};
use crate::extractors::json::AppJson;
use crate::models::auth::{
    LoginRequest, LoginResponse, VerifyResponse, validate_login_request,
};
use crate::state::AppState;
use crate::store;
use crate::utils::{credentials, jwt};

fn auth_cookie(token: String, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::hours(ttl_hours))
        .build()
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in with account + password, or a private key",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; cookie set", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload), fields(account = %payload.account))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_login_request(&payload)?;

    let found = if !payload.private_key.is_empty() {
        store::live::<user::Entity>()
            .filter(user::Column::Pk.eq(&payload.private_key))
            .one(&state.db)
            .await?
    } else {
        let account = payload.account.trim();
        let candidate = store::live::<user::Entity>()
            .filter(user::Column::Account.eq(account))
            .one(&state.db)
            .await?;

        match candidate {
            Some(u) => {
                // A malformed stored credential fails closed: the account
                // simply cannot log in with a password.
                let is_valid = credentials::verify(&payload.password, &u.password)
                    .unwrap_or_else(|e| {
                        tracing::warn!("stored credential for {account} unusable: {e}");
                        false
                    });
                is_valid.then_some(u)
            }
            None => None,
        }
    };

    let user = found.ok_or(AppError::InvalidCredentials)?;

    let ttl_hours = state.config.auth.token_ttl_hours;
    let token = jwt::sign(
        &user.id,
        &user.user_name,
        &state.config.auth.jwt_secret,
        ttl_hours,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;

    let expires = chrono::Utc::now() + chrono::Duration::hours(ttl_hours);
    let jar = jar.add(auth_cookie(token.clone(), ttl_hours));

    Ok((
        jar,
        Json(LoginResponse {
            id: user.id,
            name: user.user_name,
            avatar: user.avatar,
            token,
            expires,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/verify",
    tag = "Auth",
    operation_id = "verifyToken",
    summary = "Check whether the current token is valid",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = %auth_user.user_id))]
pub async fn verify(auth_user: AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        id: auth_user.user_id,
        name: auth_user.user_name,
    })
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    operation_id = "logout",
    summary = "Clear the authentication cookie",
    responses((status = 204, description = "Cookie cleared")),
)]
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    // An expired cookie is sent unconditionally: the reset must not depend
    // on the request having carried the cookie in the first place.
    let expired = Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build();
    (jar.add(expired), StatusCode::NO_CONTENT)
}
