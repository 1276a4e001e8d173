pub mod auth;
pub mod blog;
pub mod blog_tag;
pub mod default_image;
pub mod life_share;
pub mod plan;
pub mod shared;
pub mod upload;
pub mod user;
