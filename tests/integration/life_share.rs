use serde_json::json;

use crate::common::{TestApp, routes};

mod anonymous {
    use super::*;

    #[tokio::test]
    async fn an_anonymous_share_persists_without_an_owner() {
        let app = TestApp::spawn().await;

        let share_id = app.create_life_share(None, "From a stranger").await;

        let fetched = app.get_without_token(&routes::life_share(&share_id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["title"], "From a stranger");
        assert!(fetched.body["create_user_id"].is_null());
        assert!(fetched.body["author_name"].is_null());
    }

    #[tokio::test]
    async fn an_anonymous_share_is_immutable_forever() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("alice", "securepass").await;

        let share_id = app.create_life_share(None, "Untouchable").await;

        let patched = app
            .patch_with_token(
                &routes::life_share(&share_id),
                &json!({"title": "Claimed"}),
                &token,
            )
            .await;
        assert_eq!(patched.status, 403);
        assert_eq!(patched.body["code"], "PERMISSION_DENIED");

        let deleted = app
            .delete_with_token(&routes::life_share(&share_id), &token)
            .await;
        assert_eq!(deleted.status, 403);
    }

    #[tokio::test]
    async fn a_garbage_token_still_fails_even_though_anonymous_is_allowed() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::LIFE_SHARES,
                &json!({"title": "Hello", "content": "World"}),
                "not.a.jwt",
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod authorship {
    use super::*;

    #[tokio::test]
    async fn a_logged_in_author_is_snapshotted() {
        let app = TestApp::spawn().await;
        let (user_id, token) = app.create_authenticated_user("alice", "securepass").await;

        let share_id = app.create_life_share(Some(&token), "Signed post").await;

        let fetched = app.get_without_token(&routes::life_share(&share_id)).await;
        assert_eq!(fetched.body["create_user_id"], user_id.as_str());
        assert_eq!(fetched.body["author_name"], "alice");
    }

    #[tokio::test]
    async fn the_snapshot_survives_a_profile_rename() {
        let app = TestApp::spawn().await;
        let (user_id, token) = app.create_authenticated_user("alice", "securepass").await;

        let share_id = app.create_life_share(Some(&token), "Before rename").await;

        app.patch_with_token(
            &routes::user(&user_id),
            &json!({"user_name": "Alice Cooper"}),
            &token,
        )
        .await;

        let fetched = app.get_without_token(&routes::life_share(&share_id)).await;
        assert_eq!(fetched.body["author_name"], "alice");
    }

    #[tokio::test]
    async fn the_owner_can_update_and_delete() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("alice", "securepass").await;

        let share_id = app.create_life_share(Some(&token), "Mine").await;

        let patched = app
            .patch_with_token(
                &routes::life_share(&share_id),
                &json!({"title": "Still mine", "category": "food"}),
                &token,
            )
            .await;
        assert_eq!(patched.status, 200);
        assert_eq!(patched.body["title"], "Still mine");
        assert_eq!(patched.body["category"], "food");

        let deleted = app
            .delete_with_token(&routes::life_share(&share_id), &token)
            .await;
        assert_eq!(deleted.status, 204);

        let gone = app.get_without_token(&routes::life_share(&share_id)).await;
        assert_eq!(gone.status, 404);
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn content_cannot_be_patched_to_empty() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("alice", "securepass").await;

        let share_id = app.create_life_share(Some(&token), "Has content").await;

        let res = app
            .patch_with_token(&routes::life_share(&share_id), &json!({"content": ""}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let fetched = app.get_without_token(&routes::life_share(&share_id)).await;
        assert_eq!(fetched.body["content"], "Out in the hills today.");
    }
}

mod covers {
    use super::*;

    #[tokio::test]
    async fn a_missing_cover_falls_back_to_the_placeholder() {
        let app = TestApp::spawn().await;

        let share_id = app.create_life_share(None, "No cover").await;

        let fetched = app.get_without_token(&routes::life_share(&share_id)).await;
        assert_eq!(fetched.body["cover_image"], "https://picsum.photos/800/600");
    }

    #[tokio::test]
    async fn a_missing_cover_draws_from_the_default_pool_when_available() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("alice", "securepass").await;

        app.post_with_token(
            routes::DEFAULT_IMAGES,
            &json!({"url": "http://cdn.test/default.png"}),
            &token,
        )
        .await;

        let share_id = app.create_life_share(None, "Pool cover").await;

        let fetched = app.get_without_token(&routes::life_share(&share_id)).await;
        assert_eq!(fetched.body["cover_image"], "http://cdn.test/default.png");
    }

    #[tokio::test]
    async fn an_explicit_cover_is_kept() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LIFE_SHARES,
                &json!({
                    "title": "With cover",
                    "content": "c",
                    "cover_image": "http://cdn.test/mine.jpg",
                }),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["cover_image"], "http://cdn.test/mine.jpg");
    }
}

mod counters {
    use super::*;

    #[tokio::test]
    async fn views_and_likes_increment() {
        let app = TestApp::spawn().await;
        let share_id = app.create_life_share(None, "Counted").await;

        app.post_without_token(&routes::life_share_view(&share_id), &json!({}))
            .await;
        app.post_without_token(&routes::life_share_like(&share_id), &json!({}))
            .await;
        app.post_without_token(&routes::life_share_like(&share_id), &json!({}))
            .await;

        let fetched = app.get_without_token(&routes::life_share(&share_id)).await;
        assert_eq!(fetched.body["view_count"], 1);
        assert_eq!(fetched.body["like_count"], 2);
    }

    #[tokio::test]
    async fn likes_never_go_below_zero() {
        let app = TestApp::spawn().await;
        let share_id = app.create_life_share(None, "Unliked").await;

        let res = app
            .delete_without_token(&routes::life_share_like(&share_id))
            .await;
        assert_eq!(res.status, 204);

        let fetched = app.get_without_token(&routes::life_share(&share_id)).await;
        assert_eq!(fetched.body["like_count"], 0);
    }

    #[tokio::test]
    async fn unliking_a_missing_share_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .delete_without_token(&routes::life_share_like("nonexistent"))
            .await;

        assert_eq!(res.status, 404);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn filters_by_category() {
        let app = TestApp::spawn().await;

        app.create_life_share(None, "Trip one").await;
        app.create_life_share(None, "Trip two").await;
        app.post_without_token(
            routes::LIFE_SHARES,
            &json!({"title": "Dinner", "content": "c", "category": "food"}),
        )
        .await;

        let res = app
            .get_without_token(&format!("{}?category=travel", routes::LIFE_SHARES))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 2);
    }

    #[tokio::test]
    async fn an_unknown_category_fails_validation_on_create() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LIFE_SHARES,
                &json!({"title": "Odd", "content": "c", "category": "sports"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
