//! Member experience endpoint integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{my_day, parse_body, request, TestApp};

async fn listing_row_count(app: &TestApp, experience_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM public_experiences WHERE experience_id = $1")
        .bind(experience_id)
        .fetch_one(&app.pool)
        .await
        .unwrap()
}

mod test_share {
    use super::*;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_share_viewable_returns_201_and_lists_row() {
        let app = TestApp::new().await.unwrap();
        let member = app.create_test_member(false).await.unwrap();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                "/v1/experiences",
                Some(&member.jwt),
                Some(my_day(true)),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = parse_body(resp).await;
        assert_eq!(body["tags"], json!(["public", "non-research"]));
        assert_eq!(body["listing"], "not reviewed");

        let id = body["experience_id"].as_str().unwrap();
        assert_eq!(listing_row_count(&app, id).await, 1);
        assert_eq!(app.files.files_for(&member.oh_id).len(), 1);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_share_private_has_no_row() {
        let app = TestApp::new().await.unwrap();
        let member = app.create_test_member(false).await.unwrap();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                "/v1/experiences",
                Some(&member.jwt),
                Some(my_day(false)),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = parse_body(resp).await;
        assert!(body["listing"].is_null());
        let id = body["experience_id"].as_str().unwrap();
        assert_eq!(listing_row_count(&app, id).await, 0);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_share_missing_title_returns_400() {
        let app = TestApp::new().await.unwrap();
        let member = app.create_test_member(false).await.unwrap();

        let mut payload = my_day(true);
        payload["title"] = json!("");

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                "/v1/experiences",
                Some(&member.jwt),
                Some(payload),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(app.files.file_count(), 0);

        app.cleanup().await.unwrap();
    }
}

mod test_toggles {
    use super::*;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_visibility_round_trip() {
        let app = TestApp::new().await.unwrap();
        let member = app.create_test_member(false).await.unwrap();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                "/v1/experiences",
                Some(&member.jwt),
                Some(my_day(true)),
            ))
            .await
            .unwrap();
        let id = parse_body(resp).await["experience_id"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                &format!("/v1/experiences/{id}/make-non-viewable"),
                Some(&member.jwt),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert_eq!(body["tags"][0], "not public");
        assert_eq!(listing_row_count(&app, &id).await, 0);

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                &format!("/v1/experiences/{id}/make-viewable"),
                Some(&member.jwt),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(listing_row_count(&app, &id).await, 1);
        assert_eq!(app.files.files_for(&member.oh_id).len(), 1);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_research_toggles_update_tags() {
        let app = TestApp::new().await.unwrap();
        let member = app.create_test_member(false).await.unwrap();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                "/v1/experiences",
                Some(&member.jwt),
                Some(my_day(false)),
            ))
            .await
            .unwrap();
        let id = parse_body(resp).await["experience_id"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                &format!("/v1/experiences/{id}/make-research"),
                Some(&member.jwt),
                None,
            ))
            .await
            .unwrap();
        let body = parse_body(resp).await;
        assert_eq!(body["tags"], json!(["not public", "research"]));
        assert_eq!(body["data"]["research"], true);

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                &format!("/v1/experiences/{id}/make-non-research"),
                Some(&member.jwt),
                None,
            ))
            .await
            .unwrap();
        let body = parse_body(resp).await;
        assert_eq!(body["tags"], json!(["not public", "non-research"]));

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_toggle_unknown_experience_returns_404() {
        let app = TestApp::new().await.unwrap();
        let member = app.create_test_member(false).await.unwrap();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                "/v1/experiences/does-not-exist/make-viewable",
                Some(&member.jwt),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        app.cleanup().await.unwrap();
    }
}

mod test_edit_and_delete {
    use super::*;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_edit_updates_listing_row() {
        let app = TestApp::new().await.unwrap();
        let member = app.create_test_member(false).await.unwrap();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                "/v1/experiences",
                Some(&member.jwt),
                Some(my_day(true)),
            ))
            .await
            .unwrap();
        let id = parse_body(resp).await["experience_id"]
            .as_str()
            .unwrap()
            .to_string();

        let mut payload = my_day(true);
        payload["title"] = json!("My Evening");
        payload["violence"] = json!(true);

        let resp = app
            .router()
            .oneshot(request(
                Method::PUT,
                &format!("/v1/experiences/{id}"),
                Some(&member.jwt),
                Some(payload),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let (title, violence): (String, bool) = sqlx::query_as(
            "SELECT title_text, violence FROM public_experiences WHERE experience_id = $1",
        )
        .bind(&id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
        assert_eq!(title, "My Evening");
        assert!(violence);

        let resp = app
            .router()
            .oneshot(request(
                Method::GET,
                &format!("/v1/experiences/{id}"),
                Some(&member.jwt),
                None,
            ))
            .await
            .unwrap();
        let body = parse_body(resp).await;
        assert_eq!(body["title"], "My Evening");
        assert_eq!(body["tags"], json!(["public", "non-research", "violence"]));

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_delete_returns_204_then_404() {
        let app = TestApp::new().await.unwrap();
        let member = app.create_test_member(false).await.unwrap();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                "/v1/experiences",
                Some(&member.jwt),
                Some(my_day(true)),
            ))
            .await
            .unwrap();
        let id = parse_body(resp).await["experience_id"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = app
            .router()
            .oneshot(request(
                Method::DELETE,
                &format!("/v1/experiences/{id}"),
                Some(&member.jwt),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(listing_row_count(&app, &id).await, 0);
        assert!(app.files.files_for(&member.oh_id).is_empty());

        let resp = app
            .router()
            .oneshot(request(
                Method::DELETE,
                &format!("/v1/experiences/{id}"),
                Some(&member.jwt),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_members_only_see_their_own_experiences() {
        let app = TestApp::new().await.unwrap();
        let alice = app.create_test_member(false).await.unwrap();
        let bob = app.create_test_member(false).await.unwrap();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                "/v1/experiences",
                Some(&alice.jwt),
                Some(my_day(false)),
            ))
            .await
            .unwrap();
        let id = parse_body(resp).await["experience_id"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = app
            .router()
            .oneshot(request(Method::GET, "/v1/experiences", Some(&bob.jwt), None))
            .await
            .unwrap();
        assert_eq!(parse_body(resp).await, json!([]));

        let resp = app
            .router()
            .oneshot(request(
                Method::GET,
                &format!("/v1/experiences/{id}"),
                Some(&bob.jwt),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        app.cleanup().await.unwrap();
    }
}

mod test_listing_ownership {
    use super::*;
    use autspaces_memberdata::{FileUpload, MemberCredentials, MemberDataStore};

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_foreign_experience_id_returns_409_and_keeps_owner() {
        let app = TestApp::new().await.unwrap();
        let owner = app.create_test_member(false).await.unwrap();
        let intruder = app.create_test_member(false).await.unwrap();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                "/v1/experiences",
                Some(&owner.jwt),
                Some(my_day(true)),
            ))
            .await
            .unwrap();
        let id = parse_body(resp).await["experience_id"]
            .as_str()
            .unwrap()
            .to_string();

        // The intruder's store holds a record claiming the owner's identifier
        let original = app.files.files_for(&owner.oh_id).remove(0);
        let upload = FileUpload {
            filename: original.basename.clone(),
            content: app.files.content_of(original.id).unwrap(),
            metadata: original.metadata.clone(),
        };
        let credentials = MemberCredentials {
            project_member_id: intruder.oh_id.clone(),
            access_token: format!("token-{}", intruder.oh_id),
        };
        app.files.upload(&credentials, upload).await.unwrap();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                &format!("/v1/experiences/{id}/make-viewable"),
                Some(&intruder.jwt),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "CONFLICT");

        let member_id: uuid::Uuid =
            sqlx::query_scalar("SELECT member_id FROM public_experiences WHERE experience_id = $1")
                .bind(&id)
                .fetch_one(&app.pool)
                .await
                .unwrap();
        assert_eq!(member_id, owner.id);
        assert_eq!(listing_row_count(&app, &id).await, 1);

        app.cleanup().await.unwrap();
    }
}
