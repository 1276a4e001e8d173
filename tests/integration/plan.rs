use serde_json::json;

use crate::common::{TestApp, routes};

mod pagination {
    use super::*;

    #[tokio::test]
    async fn pages_carve_the_total_into_page_size_chunks() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("alice", "securepass").await;

        for i in 1..=5 {
            app.create_plan(&token, &format!("Plan {i}"), "2026-06-01T00:00:00Z")
                .await;
        }

        let mut seen = Vec::new();
        for (page, expected) in [(1, 2), (2, 2), (3, 1)] {
            let res = app
                .get_without_token(&format!("{}?page={page}&page_size=2", routes::PLANS))
                .await;
            assert_eq!(res.status, 200);

            let data = res.body["data"].as_array().unwrap();
            assert_eq!(data.len(), expected, "page {page}");
            assert_eq!(res.body["pagination"]["total"], 5);
            assert_eq!(res.body["pagination"]["total_pages"], 3);
            seen.extend(data.iter().map(|p| p["id"].as_str().unwrap().to_string()));
        }

        // No item is repeated or dropped across pages.
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 5);
    }

    #[tokio::test]
    async fn an_absurd_page_number_yields_an_empty_page_not_an_error() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("alice", "securepass").await;
        app.create_plan(&token, "Only one", "2026-06-01T00:00:00Z")
            .await;

        let res = app
            .get_without_token(&format!(
                "{}?page={}&page_size=100",
                routes::PLANS,
                u64::MAX
            ))
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["data"].as_array().unwrap().is_empty());
        assert_eq!(res.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn a_page_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("alice", "securepass").await;
        app.create_plan(&token, "Only one", "2026-06-01T00:00:00Z")
            .await;

        let res = app
            .get_without_token(&format!("{}?page=4&page_size=10", routes::PLANS))
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["data"].as_array().unwrap().is_empty());
        assert_eq!(res.body["pagination"]["total"], 1);
    }
}

mod filtering {
    use super::*;

    #[tokio::test]
    async fn the_year_filter_selects_deadlines_in_that_year() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("alice", "securepass").await;

        app.create_plan(&token, "This year", "2026-03-15T12:00:00Z")
            .await;
        app.create_plan(&token, "New years eve", "2026-12-31T23:59:59Z")
            .await;
        app.create_plan(&token, "Next year", "2027-01-01T00:00:00Z")
            .await;

        let res = app
            .get_without_token(&format!("{}?year=2026", routes::PLANS))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 2);
        let titles: Vec<_> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_string())
            .collect();
        assert!(titles.contains(&"This year".to_string()));
        assert!(titles.contains(&"New years eve".to_string()));
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn a_plan_can_be_completed_and_deleted_by_its_owner() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("alice", "securepass").await;

        let plan_id = app
            .create_plan(&token, "Ship the site", "2026-09-01T00:00:00Z")
            .await;

        let completed = app
            .patch_with_token(
                &routes::plan(&plan_id),
                &json!({"is_complete": true}),
                &token,
            )
            .await;
        assert_eq!(completed.status, 200);
        assert_eq!(completed.body["is_complete"], true);

        let deleted = app.delete_with_token(&routes::plan(&plan_id), &token).await;
        assert_eq!(deleted.status, 204);

        let gone = app.get_without_token(&routes::plan(&plan_id)).await;
        assert_eq!(gone.status, 404);
    }

    #[tokio::test]
    async fn a_null_deadline_clears_the_field() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user("alice", "securepass").await;

        let plan_id = app
            .create_plan(&token, "No rush", "2026-09-01T00:00:00Z")
            .await;

        let res = app
            .patch_with_token(&routes::plan(&plan_id), &json!({"deadline": null}), &token)
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["deadline"].is_null());
    }

    #[tokio::test]
    async fn a_non_owner_cannot_update() {
        let app = TestApp::spawn().await;
        let (_, alice) = app.create_authenticated_user("alice", "securepass").await;
        let (_, bob) = app.create_authenticated_user("bob", "securepass").await;

        let plan_id = app
            .create_plan(&alice, "Private plan", "2026-09-01T00:00:00Z")
            .await;

        let res = app
            .patch_with_token(&routes::plan(&plan_id), &json!({"title": "Taken"}), &bob)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}
