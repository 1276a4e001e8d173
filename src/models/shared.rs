use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub page_size: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size),
        }
    }
}

/// Normalize raw pagination query params: pages are 1-indexed, the page
/// size defaults to 20 and is clamped to 1..=100.
pub fn page_params(page: Option<u64>, page_size: Option<u64>) -> (u64, u64) {
    let page = Ord::max(page.unwrap_or(1), 1);
    let page_size = page_size.unwrap_or(20).clamp(1, 100);
    (page, page_size)
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a required trimmed text field against a character budget.
pub fn validate_text(name: &str, value: &str, max_chars: usize) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "{name} must be 1-{max_chars} characters"
        )));
    }
    Ok(())
}

/// Validate an optional text field against a character budget (empty is
/// allowed; it means "clear").
pub fn validate_optional_text(
    name: &str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<(), AppError> {
    if let Some(value) = value
        && value.chars().count() > max_chars
    {
        return Err(AppError::Validation(format!(
            "{name} must be at most {max_chars} characters"
        )));
    }
    Ok(())
}
