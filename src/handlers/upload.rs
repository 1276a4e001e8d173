use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::upload::{MultiUploadFileResponse, UploadFileResponse, UploadQuery};
use crate::state::AppState;
use crate::utils::object_key::make_object_key;

/// Maximum size per uploaded file (10 MB).
const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum number of files per batch upload.
const MAX_BATCH_FILES: usize = 20;

const ALLOWED_CONTENT_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp"];

const DEFAULT_MODULE: &str = "common";

struct IncomingFile {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn next_file(multipart: &mut Multipart) -> Result<Option<IncomingFile>, AppError> {
    let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    else {
        return Ok(None);
    };

    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();

    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported content type '{content_type}'; allowed: {}",
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;

    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".into()));
    }
    if bytes.len() > MAX_FILE_SIZE {
        return Err(AppError::Validation(
            "File exceeds the 10MB size limit".into(),
        ));
    }

    Ok(Some(IncomingFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

async fn store_file(
    state: &AppState,
    module: &str,
    file: &IncomingFile,
    index: Option<usize>,
) -> Result<UploadFileResponse, AppError> {
    let key = make_object_key(module, &file.file_name, index);
    state
        .storage
        .put(&key, &file.bytes, &file.content_type)
        .await?;
    let url = state.storage.url_for(&key).await?;

    Ok(UploadFileResponse {
        url,
        file_name: key,
    })
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Uploads",
    operation_id = "uploadFile",
    summary = "Upload a single image",
    description = "Accepts one multipart file field. JPEG/PNG/GIF/WebP only, \
        up to 10MB. The optional `module` query param becomes the key prefix.",
    params(UploadQuery),
    request_body(content_type = "multipart/form-data", description = "One image file"),
    responses(
        (status = 201, description = "File stored", body = UploadFileResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Object storage unreachable (DEPENDENCY_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = %auth_user.user_id))]
pub async fn upload_file(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let module = query.module.as_deref().unwrap_or(DEFAULT_MODULE);

    let file = next_file(&mut multipart)
        .await?
        .ok_or_else(|| AppError::Validation("Missing file field".into()))?;

    let stored = store_file(&state, module, &file, None).await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

#[utoipa::path(
    post,
    path = "/uploads",
    tag = "Uploads",
    operation_id = "uploadFiles",
    summary = "Upload a batch of images",
    description = "Accepts up to 20 multipart file fields, each validated like \
        the single upload. Keys get a per-file index so a batch created within \
        one second stays collision-free.",
    params(UploadQuery),
    request_body(content_type = "multipart/form-data", description = "Up to 20 image files"),
    responses(
        (status = 201, description = "Files stored", body = MultiUploadFileResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Object storage unreachable (DEPENDENCY_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = %auth_user.user_id))]
pub async fn upload_files(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let module = query.module.as_deref().unwrap_or(DEFAULT_MODULE);

    // All parts are validated before the first byte goes to storage, so a
    // bad file late in the batch cannot leave half the batch uploaded.
    let mut files = Vec::new();
    while let Some(file) = next_file(&mut multipart).await? {
        if files.len() == MAX_BATCH_FILES {
            return Err(AppError::Validation(
                "A batch may contain at most 20 files".into(),
            ));
        }
        files.push(file);
    }

    if files.is_empty() {
        return Err(AppError::Validation("Missing file fields".into()));
    }

    let mut stored = Vec::with_capacity(files.len());
    for (index, file) in files.iter().enumerate() {
        stored.push(store_file(&state, module, file, Some(index)).await?);
    }

    Ok((
        StatusCode::CREATED,
        Json(MultiUploadFileResponse { files: stored }),
    ))
}

/// Body limit for the single-file route: one file plus multipart framing.
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(12 * 1024 * 1024)
}

/// Body limit for the batch route: twenty files plus multipart framing.
pub fn batch_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(220 * 1024 * 1024)
}
