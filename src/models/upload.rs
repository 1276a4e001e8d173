use serde::{Deserialize, Serialize};

/// One stored object, as returned to the uploader.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadFileResponse {
    /// Public or presigned URL for the stored object.
    pub url: String,
    /// Object key within the bucket.
    pub file_name: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MultiUploadFileResponse {
    pub files: Vec<UploadFileResponse>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UploadQuery {
    /// Key prefix grouping uploads by feature area, e.g. `blog`.
    pub module: Option<String>,
}
