use serde_json::json;

use crate::common::{TestApp, routes};

async fn create_tag(app: &TestApp, token: &str, name: &str) -> String {
    let res = app
        .post_with_token(
            routes::BLOG_TAGS,
            &json!({
                "tag_name": name,
                "sub_tag_name": "general",
                "icon": "<svg/>",
                "color": "#e96900",
            }),
            token,
        )
        .await;
    assert_eq!(res.status, 201, "create_tag failed: {}", res.text);
    res.id()
}

#[tokio::test]
async fn tags_can_be_created_listed_and_fetched() {
    let app = TestApp::spawn().await;
    let (_, token) = app.create_authenticated_user("alice", "securepass").await;

    let tag_id = create_tag(&app, &token, "rust").await;
    create_tag(&app, &token, "axum").await;

    let list = app.get_without_token(routes::BLOG_TAGS).await;
    assert_eq!(list.status, 200);
    assert_eq!(list.body["pagination"]["total"], 2);

    let fetched = app.get_without_token(&routes::blog_tag(&tag_id)).await;
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.body["tag_name"], "rust");
    assert_eq!(fetched.body["color"], "#e96900");
}

#[tokio::test]
async fn only_the_owner_can_update_a_tag() {
    let app = TestApp::spawn().await;
    let (_, alice) = app.create_authenticated_user("alice", "securepass").await;
    let (_, bob) = app.create_authenticated_user("bob", "securepass").await;

    let tag_id = create_tag(&app, &alice, "rust").await;

    let forbidden = app
        .patch_with_token(
            &routes::blog_tag(&tag_id),
            &json!({"color": "#000000"}),
            &bob,
        )
        .await;
    assert_eq!(forbidden.status, 403);

    let updated = app
        .patch_with_token(
            &routes::blog_tag(&tag_id),
            &json!({"color": "#000000"}),
            &alice,
        )
        .await;
    assert_eq!(updated.status, 200);
    assert_eq!(updated.body["color"], "#000000");
}

#[tokio::test]
async fn deletion_is_terminal() {
    let app = TestApp::spawn().await;
    let (_, token) = app.create_authenticated_user("alice", "securepass").await;

    let tag_id = create_tag(&app, &token, "ephemeral").await;

    let first = app.delete_with_token(&routes::blog_tag(&tag_id), &token).await;
    assert_eq!(first.status, 204);

    let second = app.delete_with_token(&routes::blog_tag(&tag_id), &token).await;
    assert_eq!(second.status, 404);

    let gone = app.get_without_token(&routes::blog_tag(&tag_id)).await;
    assert_eq!(gone.status, 404);
}

#[tokio::test]
async fn an_empty_tag_name_fails_validation() {
    let app = TestApp::spawn().await;
    let (_, token) = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .post_with_token(
            routes::BLOG_TAGS,
            &json!({
                "tag_name": "   ",
                "sub_tag_name": "general",
                "icon": "<svg/>",
                "color": "#e96900",
            }),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
