use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/blogs", blog_routes())
        .nest("/blog-tags", blog_tag_routes())
        .nest("/life-shares", life_share_routes())
        .nest("/plans", plan_routes())
        .nest("/default-images", default_image_routes())
        .merge(upload_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::verify))
        .routes(routes!(handlers::auth::logout))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::user::list_users, handlers::user::register))
        .routes(routes!(
            handlers::user::get_user,
            handlers::user::update_user,
            handlers::user::delete_user
        ))
        .routes(routes!(handlers::user::update_password))
}

fn blog_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::blog::list_blogs,
            handlers::blog::create_blog
        ))
        .routes(routes!(
            handlers::blog::get_blog,
            handlers::blog::update_blog,
            handlers::blog::delete_blog
        ))
        .routes(routes!(handlers::blog::view_blog))
}

fn blog_tag_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::blog_tag::list_blog_tags,
            handlers::blog_tag::create_blog_tag
        ))
        .routes(routes!(
            handlers::blog_tag::get_blog_tag,
            handlers::blog_tag::update_blog_tag,
            handlers::blog_tag::delete_blog_tag
        ))
}

fn life_share_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::life_share::list_life_shares,
            handlers::life_share::create_life_share
        ))
        .routes(routes!(
            handlers::life_share::get_life_share,
            handlers::life_share::update_life_share,
            handlers::life_share::delete_life_share
        ))
        .routes(routes!(handlers::life_share::view_life_share))
        .routes(routes!(
            handlers::life_share::like_life_share,
            handlers::life_share::unlike_life_share
        ))
}

fn plan_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::plan::list_plans,
            handlers::plan::create_plan
        ))
        .routes(routes!(
            handlers::plan::get_plan,
            handlers::plan::update_plan,
            handlers::plan::delete_plan
        ))
}

fn default_image_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::default_image::list_default_images,
            handlers::default_image::create_default_image
        ))
        .routes(routes!(handlers::default_image::get_random_default_image))
        .routes(routes!(
            handlers::default_image::get_default_image,
            handlers::default_image::update_default_image,
            handlers::default_image::delete_default_image
        ))
}

fn upload_routes() -> OpenApiRouter<AppState> {
    let single = OpenApiRouter::new()
        .routes(routes!(handlers::upload::upload_file))
        .layer(handlers::upload::upload_body_limit());

    let batch = OpenApiRouter::new()
        .routes(routes!(handlers::upload::upload_files))
        .layer(handlers::upload::batch_body_limit());

    single.merge(batch)
}
