//! Moderation endpoint integration tests

use axum::http::{Method, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use crate::common::{my_day, parse_body, request, TestApp, TestMember};

async fn share_viewable(app: &TestApp, member: &TestMember) -> String {
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
    parse_body(resp).await["experience_id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_non_moderator_gets_403() {
    let app = TestApp::new().await.unwrap();
    let member = app.create_test_member(false).await.unwrap();

    let resp = app
        .router()
        .oneshot(request(
            Method::GET,
            "/v1/moderation/experiences",
            Some(&member.jwt),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_queue_contains_new_row() {
    let app = TestApp::new().await.unwrap();
    let member = app.create_test_member(false).await.unwrap();
    let moderator = app.create_test_member(true).await.unwrap();
    let id = share_viewable(&app, &member).await;

    let resp = app
        .router()
        .oneshot(request(
            Method::GET,
            "/v1/moderation/experiences?limit=100",
            Some(&moderator.jwt),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = parse_body(resp).await;
    let rows = body.as_array().unwrap();
    assert!(rows
        .iter()
        .any(|row| row["experience_id"] == Value::from(id.clone())));
    assert!(rows
        .iter()
        .all(|row| row["moderation_status"] == "not reviewed"));

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_approve_then_conflict() {
    let app = TestApp::new().await.unwrap();
    let member = app.create_test_member(false).await.unwrap();
    let moderator = app.create_test_member(true).await.unwrap();
    let id = share_viewable(&app, &member).await;

    let uri = format!("/v1/moderation/experiences/{id}/approve");
    let resp = app
        .router()
        .oneshot(request(Method::POST, &uri, Some(&moderator.jwt), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["moderation_status"], "approved");
    assert_eq!(body["title_text"], "My Day");

    let resp = app
        .router()
        .oneshot(request(Method::POST, &uri, Some(&moderator.jwt), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    app.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_approve_unknown_returns_404() {
    let app = TestApp::new().await.unwrap();
    let moderator = app.create_test_member(true).await.unwrap();

    let resp = app
        .router()
        .oneshot(request(
            Method::POST,
            "/v1/moderation/experiences/does-not-exist/approve",
            Some(&moderator.jwt),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    app.cleanup().await.unwrap();
}
