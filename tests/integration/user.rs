use serde_json::json;

use crate::common::{TestApp, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn a_new_user_can_register() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::USERS,
                &json!({"account": "alice", "password": "securepass", "user_name": "Alice"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["account"], "alice");
        assert_eq!(res.body["user_name"], "Alice");
        // The stored credential and private key never leave the service.
        assert!(res.body.get("password").is_none());
        assert!(res.body.get("pk").is_none());
    }

    #[tokio::test]
    async fn a_taken_account_is_rejected() {
        let app = TestApp::spawn().await;
        let body = json!({"account": "alice", "password": "securepass", "user_name": "Alice"});

        let first = app.post_without_token(routes::USERS, &body).await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app.post_without_token(routes::USERS, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "ACCOUNT_TAKEN");
    }

    #[tokio::test]
    async fn a_short_password_fails_validation() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::USERS,
                &json!({"account": "alice", "password": "short", "user_name": "Alice"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn an_account_with_whitespace_fails_validation() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::USERS,
                &json!({"account": "al ice", "password": "securepass", "user_name": "Alice"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn a_user_can_update_their_own_profile() {
        let app = TestApp::spawn().await;
        let (user_id, token) = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .patch_with_token(
                &routes::user(&user_id),
                &json!({"user_name": "Alice Cooper", "avatar": "https://cdn.test/a.png"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["user_name"], "Alice Cooper");

        // The cached projection reflects the update immediately.
        let fetched = app.get_without_token(&routes::user(&user_id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["user_name"], "Alice Cooper");
    }

    #[tokio::test]
    async fn a_user_cannot_update_someone_elses_profile() {
        let app = TestApp::spawn().await;
        let (alice_id, _) = app.create_authenticated_user("alice", "securepass").await;
        let (_, bob_token) = app.create_authenticated_user("bob", "securepass").await;

        let res = app
            .patch_with_token(
                &routes::user(&alice_id),
                &json!({"user_name": "Hijacked"}),
                &bob_token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn a_null_avatar_clears_the_field() {
        let app = TestApp::spawn().await;
        let (user_id, token) = app.create_authenticated_user("alice", "securepass").await;

        app.patch_with_token(
            &routes::user(&user_id),
            &json!({"avatar": "https://cdn.test/a.png"}),
            &token,
        )
        .await;

        let res = app
            .patch_with_token(&routes::user(&user_id), &json!({"avatar": null}), &token)
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["avatar"].is_null());
    }
}

mod password {
    use super::*;

    #[tokio::test]
    async fn a_user_can_change_their_password_and_log_in_with_it() {
        let app = TestApp::spawn().await;
        let (user_id, token) = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .put_with_token(
                &routes::user_password(&user_id),
                &json!({"old_password": "securepass", "new_password": "evenmoresecure"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 204);

        let old = app
            .post_without_token(
                routes::LOGIN,
                &json!({"account": "alice", "password": "securepass"}),
            )
            .await;
        assert_eq!(old.status, 401);

        let new = app
            .post_without_token(
                routes::LOGIN,
                &json!({"account": "alice", "password": "evenmoresecure"}),
            )
            .await;
        assert_eq!(new.status, 200);
    }

    #[tokio::test]
    async fn the_old_password_must_match() {
        let app = TestApp::spawn().await;
        let (user_id, token) = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .put_with_token(
                &routes::user_password(&user_id),
                &json!({"old_password": "wrongpass", "new_password": "evenmoresecure"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn a_user_can_delete_their_own_account() {
        let app = TestApp::spawn().await;
        let (user_id, token) = app.create_authenticated_user("alice", "securepass").await;

        let res = app.delete_with_token(&routes::user(&user_id), &token).await;
        assert_eq!(res.status, 204);

        let fetched = app.get_without_token(&routes::user(&user_id)).await;
        assert_eq!(fetched.status, 404);

        // Deleted accounts cannot log in.
        let login = app
            .post_without_token(
                routes::LOGIN,
                &json!({"account": "alice", "password": "securepass"}),
            )
            .await;
        assert_eq!(login.status, 401);
    }

    #[tokio::test]
    async fn deletion_is_terminal() {
        let app = TestApp::spawn().await;
        let (user_id, token) = app.create_authenticated_user("alice", "securepass").await;

        app.delete_with_token(&routes::user(&user_id), &token).await;
        let second = app.delete_with_token(&routes::user(&user_id), &token).await;

        assert_eq!(second.status, 404);
        assert_eq!(second.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn a_user_cannot_delete_someone_elses_account() {
        let app = TestApp::spawn().await;
        let (alice_id, _) = app.create_authenticated_user("alice", "securepass").await;
        let (_, bob_token) = app.create_authenticated_user("bob", "securepass").await;

        let res = app
            .delete_with_token(&routes::user(&alice_id), &bob_token)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn users_are_listed_with_pagination_metadata() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice", "securepass").await;
        app.create_authenticated_user("bob", "securepass").await;

        let res = app.get_without_token(routes::USERS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["pagination"]["total"], 2);
    }
}
