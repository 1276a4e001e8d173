use serde_json::json;

use crate::common::{TestApp, routes};

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn full_owner_lifecycle() {
        let app = TestApp::spawn().await;
        let (_, owner) = app.create_authenticated_user("alice", "securepass").await;
        let (_, intruder) = app.create_authenticated_user("bob", "securepass").await;

        let blog_id = app.create_blog(&owner, "My first post").await;

        let fetched = app.get_without_token(&routes::blog(&blog_id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["title"], "My first post");

        let forbidden = app
            .patch_with_token(
                &routes::blog(&blog_id),
                &json!({"title": "Hijacked"}),
                &intruder,
            )
            .await;
        assert_eq!(forbidden.status, 403);
        assert_eq!(forbidden.body["code"], "PERMISSION_DENIED");

        let updated = app
            .patch_with_token(
                &routes::blog(&blog_id),
                &json!({"title": "Revised post"}),
                &owner,
            )
            .await;
        assert_eq!(updated.status, 200);
        assert_eq!(updated.body["title"], "Revised post");

        let deleted = app.delete_with_token(&routes::blog(&blog_id), &owner).await;
        assert_eq!(deleted.status, 204);

        let gone = app.get_without_token(&routes::blog(&blog_id)).await;
        assert_eq!(gone.status, 404);
    }

    #[tokio::test]
    async fn creating_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::BLOGS,
                &json!({
                    "title": "Anonymous",
                    "summary": "s",
                    "content": "c",
                    "content_html": "<p>c</p>",
                    "tags": "",
                }),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn deletion_is_terminal() {
        let app = TestApp::spawn().await;
        let (_, owner) = app.create_authenticated_user("alice", "securepass").await;
        let blog_id = app.create_blog(&owner, "Short-lived").await;

        let first = app.delete_with_token(&routes::blog(&blog_id), &owner).await;
        assert_eq!(first.status, 204);

        let second = app.delete_with_token(&routes::blog(&blog_id), &owner).await;
        assert_eq!(second.status, 404);
        assert_eq!(second.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn a_non_owner_cannot_delete() {
        let app = TestApp::spawn().await;
        let (_, owner) = app.create_authenticated_user("alice", "securepass").await;
        let (_, intruder) = app.create_authenticated_user("bob", "securepass").await;
        let blog_id = app.create_blog(&owner, "Keep out").await;

        let res = app
            .delete_with_token(&routes::blog(&blog_id), &intruder)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod cache {
    use super::*;

    #[tokio::test]
    async fn a_get_after_update_sees_the_fresh_projection() {
        let app = TestApp::spawn().await;
        let (_, owner) = app.create_authenticated_user("alice", "securepass").await;
        let blog_id = app.create_blog(&owner, "Original title").await;

        // Prime the cache.
        let primed = app.get_without_token(&routes::blog(&blog_id)).await;
        assert_eq!(primed.body["title"], "Original title");

        app.patch_with_token(
            &routes::blog(&blog_id),
            &json!({"title": "Updated title"}),
            &owner,
        )
        .await;

        let fetched = app.get_without_token(&routes::blog(&blog_id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["title"], "Updated title");
    }

    #[tokio::test]
    async fn a_get_after_delete_misses() {
        let app = TestApp::spawn().await;
        let (_, owner) = app.create_authenticated_user("alice", "securepass").await;
        let blog_id = app.create_blog(&owner, "Cached then gone").await;

        // Prime the cache, then delete.
        app.get_without_token(&routes::blog(&blog_id)).await;
        app.delete_with_token(&routes::blog(&blog_id), &owner).await;

        let fetched = app.get_without_token(&routes::blog(&blog_id)).await;
        assert_eq!(fetched.status, 404);
    }
}

mod counters {
    use super::*;

    #[tokio::test]
    async fn views_increment_and_show_up_on_the_next_read() {
        let app = TestApp::spawn().await;
        let (_, owner) = app.create_authenticated_user("alice", "securepass").await;
        let blog_id = app.create_blog(&owner, "Popular").await;

        // Prime the cache so the counter bump must invalidate it.
        let before = app.get_without_token(&routes::blog(&blog_id)).await;
        assert_eq!(before.body["view_count"], 0);

        for _ in 0..3 {
            let res = app
                .post_without_token(&routes::blog_view(&blog_id), &json!({}))
                .await;
            assert_eq!(res.status, 204);
        }

        let after = app.get_without_token(&routes::blog(&blog_id)).await;
        assert_eq!(after.body["view_count"], 3);
    }

    #[tokio::test]
    async fn viewing_a_missing_blog_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(&routes::blog_view("nonexistent"), &json!({}))
            .await;

        assert_eq!(res.status, 404);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn filters_by_owner_and_tag() {
        let app = TestApp::spawn().await;
        let (alice_id, alice) = app.create_authenticated_user("alice", "securepass").await;
        let (_, bob) = app.create_authenticated_user("bob", "securepass").await;

        app.create_blog(&alice, "Alice post").await;
        app.create_blog(&bob, "Bob post").await;

        let by_owner = app
            .get_without_token(&format!("{}?user_id={alice_id}", routes::BLOGS))
            .await;
        assert_eq!(by_owner.body["pagination"]["total"], 1);
        assert_eq!(by_owner.body["data"][0]["title"], "Alice post");

        let by_tag = app
            .get_without_token(&format!("{}?tag=rust", routes::BLOGS))
            .await;
        assert_eq!(by_tag.body["pagination"]["total"], 2);

        let no_match = app
            .get_without_token(&format!("{}?tag=cobol", routes::BLOGS))
            .await;
        assert_eq!(no_match.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn min_views_filters_and_sorts_by_views() {
        let app = TestApp::spawn().await;
        let (_, owner) = app.create_authenticated_user("alice", "securepass").await;

        let quiet = app.create_blog(&owner, "Quiet").await;
        let busy = app.create_blog(&owner, "Busy").await;
        let medium = app.create_blog(&owner, "Medium").await;

        for _ in 0..5 {
            app.post_without_token(&routes::blog_view(&busy), &json!({}))
                .await;
        }
        for _ in 0..2 {
            app.post_without_token(&routes::blog_view(&medium), &json!({}))
                .await;
        }

        let res = app
            .get_without_token(&format!("{}?min_views=1", routes::BLOGS))
            .await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["title"], "Busy");
        assert_eq!(data[1]["title"], "Medium");
        assert!(!data.iter().any(|b| b["id"] == quiet.as_str()));
    }

    #[tokio::test]
    async fn deleted_blogs_are_excluded_from_lists() {
        let app = TestApp::spawn().await;
        let (_, owner) = app.create_authenticated_user("alice", "securepass").await;

        app.create_blog(&owner, "Stays").await;
        let doomed = app.create_blog(&owner, "Goes").await;
        app.delete_with_token(&routes::blog(&doomed), &owner).await;

        let res = app.get_without_token(routes::BLOGS).await;

        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["title"], "Stays");
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn an_overlong_title_is_rejected() {
        let app = TestApp::spawn().await;
        let (_, owner) = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(
                routes::BLOGS,
                &json!({
                    "title": "x".repeat(21),
                    "summary": "s",
                    "content": "c",
                    "content_html": "<p>c</p>",
                    "tags": "",
                }),
                &owner,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
