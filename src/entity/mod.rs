pub mod blog;
pub mod blog_tag;
pub mod default_image;
pub mod life_share;
pub mod plan;
pub mod user;

/// New primary key for a freshly created record (UUID v4, no hyphens).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
