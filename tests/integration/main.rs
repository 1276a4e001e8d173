
mod blog;
mod blog_tag;
mod default_image;
mod life_share;
mod plan;
mod user;
