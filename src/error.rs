use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, RuntimeErr};
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `PERMISSION_DENIED`, `NOT_FOUND`,
    /// `CONFLICT`, `ACCOUNT_TAKEN`, `DEPENDENCY_TIMEOUT`, `DEPENDENCY_UNAVAILABLE`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Title must be 1-30 characters")]
    pub message: String,
}

/// Application-level error type.
///
/// Expected outcomes (`NotFound`, `PermissionDenied`, `Conflict`) are
/// ordinary values of this enum; only genuine infrastructure failures
/// flow through the dependency and internal variants.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    /// Record exists but is owned by another user.
    PermissionDenied,
    /// Record absent or already soft-deleted; callers cannot tell which.
    NotFound(String),
    Conflict(String),
    AccountTaken,
    /// Backing store or object storage timed out.
    DependencyTimeout(String),
    /// Backing store or object storage unreachable.
    DependencyUnavailable(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid account or password".into(),
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "You do not own this record".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::AccountTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "ACCOUNT_TAKEN",
                    message: "Account is already taken".into(),
                },
            ),
            AppError::DependencyTimeout(detail) => {
                tracing::error!("Dependency timeout: {}", detail);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    ErrorBody {
                        code: "DEPENDENCY_TIMEOUT",
                        message: "A backing service timed out".into(),
                    },
                )
            }
            AppError::DependencyUnavailable(detail) => {
                tracing::error!("Dependency unavailable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody {
                        code: "DEPENDENCY_UNAVAILABLE",
                        message: "A backing service is unavailable".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::ConnectionAcquire(_) => AppError::DependencyUnavailable(err.to_string()),
            DbErr::Conn(RuntimeErr::SqlxError(e)) if e.to_string().contains("timed out") => {
                AppError::DependencyTimeout(err.to_string())
            }
            DbErr::Conn(_) => AppError::DependencyUnavailable(err.to_string()),
            _ => AppError::Internal(err.to_string()),
        }
    }
}
