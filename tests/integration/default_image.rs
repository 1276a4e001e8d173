use serde_json::json;

use crate::common::{TestApp, routes};

async fn create_image(app: &TestApp, token: &str, url: &str) -> String {
    let res = app
        .post_with_token(routes::DEFAULT_IMAGES, &json!({"url": url}), token)
        .await;
    assert_eq!(res.status, 201, "create_image failed: {}", res.text);
    res.id()
}

#[tokio::test]
async fn images_can_be_created_listed_and_fetched() {
    let app = TestApp::spawn().await;
    let (_, token) = app.create_authenticated_user("alice", "securepass").await;

    let image_id = create_image(&app, &token, "http://cdn.test/one.png").await;
    create_image(&app, &token, "http://cdn.test/two.png").await;

    let list = app.get_without_token(routes::DEFAULT_IMAGES).await;
    assert_eq!(list.status, 200);
    assert_eq!(list.body["pagination"]["total"], 2);

    let fetched = app
        .get_without_token(&routes::default_image(&image_id))
        .await;
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.body["url"], "http://cdn.test/one.png");
}

#[tokio::test]
async fn the_url_can_be_updated_by_the_owner() {
    let app = TestApp::spawn().await;
    let (_, token) = app.create_authenticated_user("alice", "securepass").await;
    let (_, other) = app.create_authenticated_user("bob", "securepass").await;

    let image_id = create_image(&app, &token, "http://cdn.test/old.png").await;

    let forbidden = app
        .patch_with_token(
            &routes::default_image(&image_id),
            &json!({"url": "http://cdn.test/stolen.png"}),
            &other,
        )
        .await;
    assert_eq!(forbidden.status, 403);

    let updated = app
        .patch_with_token(
            &routes::default_image(&image_id),
            &json!({"url": "http://cdn.test/new.png"}),
            &token,
        )
        .await;
    assert_eq!(updated.status, 200);
    assert_eq!(updated.body["url"], "http://cdn.test/new.png");
}

#[tokio::test]
async fn a_random_image_comes_from_the_pool() {
    let app = TestApp::spawn().await;
    let (_, token) = app.create_authenticated_user("alice", "securepass").await;

    let urls = [
        "http://cdn.test/a.png",
        "http://cdn.test/b.png",
        "http://cdn.test/c.png",
    ];
    for url in urls {
        create_image(&app, &token, url).await;
    }

    let res = app.get_without_token(routes::RANDOM_DEFAULT_IMAGE).await;

    assert_eq!(res.status, 200);
    let url = res.body["url"].as_str().unwrap();
    assert!(urls.contains(&url), "unexpected url {url}");
}

#[tokio::test]
async fn a_random_draw_on_an_empty_pool_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::RANDOM_DEFAULT_IMAGE).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn deleted_images_leave_the_pool() {
    let app = TestApp::spawn().await;
    let (_, token) = app.create_authenticated_user("alice", "securepass").await;

    let image_id = create_image(&app, &token, "http://cdn.test/only.png").await;

    let deleted = app
        .delete_with_token(&routes::default_image(&image_id), &token)
        .await;
    assert_eq!(deleted.status, 204);

    let random = app.get_without_token(routes::RANDOM_DEFAULT_IMAGE).await;
    assert_eq!(random.status, 404);
}

#[tokio::test]
async fn an_overlong_url_fails_validation() {
    let app = TestApp::spawn().await;
    let (_, token) = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .post_with_token(
            routes::DEFAULT_IMAGES,
            &json!({"url": format!("http://cdn.test/{}.png", "x".repeat(500))}),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
