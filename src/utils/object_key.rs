//! Object-storage key generation for uploads.
//!
//! Keys look like `{module}/{timestamp}_{rand}[_{index}]{ext}`. The
//! timestamp has second resolution; the 4-digit random suffix makes
//! same-second collisions improbable; the batch index guarantees
//! uniqueness within one request even under an identical second and
//! random draw. Callers validate content type and size before asking for
//! a key (jpeg/png/gif/webp, 10 MB, 20 files per batch).

use rand::Rng;

/// Build a collision-resistant storage key for an uploaded file.
///
/// Both the module and the extension are reduced to a safe alphabet, so
/// the result never contains traversal sequences or characters needing
/// escaping in an object-storage namespace.
pub fn make_object_key(module: &str, original_filename: &str, index: Option<usize>) -> String {
    let module = sanitize_segment(module, "default");
    let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    let rand_suffix: u16 = rand::rng().random_range(1000..=9999);
    let ext = extension_of(original_filename);

    match index {
        Some(i) => format!("{module}/{timestamp}_{rand_suffix}_{i}{ext}"),
        None => format!("{module}/{timestamp}_{rand_suffix}{ext}"),
    }
}

/// Lowercased extension with its leading dot, or empty when the filename
/// has none worth keeping.
fn extension_of(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            let ext: String = ext
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase();
            if ext.is_empty() {
                String::new()
            } else {
                format!(".{ext}")
            }
        }
        _ => String::new(),
    }
}

fn sanitize_segment(value: &str, fallback: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect::<String>()
        .to_ascii_lowercase();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}
