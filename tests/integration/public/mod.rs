//! Public listing endpoint integration tests

use axum::http::{Method, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use crate::common::{my_day, parse_body, request, TestApp};

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_only_approved_rows_are_public_and_filters_apply() {
    let app = TestApp::new().await.unwrap();
    let member = app.create_test_member(false).await.unwrap();
    let moderator = app.create_test_member(true).await.unwrap();

    let mut ids = Vec::new();
    for drug in [false, true] {
        let mut payload = my_day(true);
        payload["drug"] = Value::Bool(drug);
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
        ids.push(
            parse_body(resp).await["experience_id"]
                .as_str()
                .unwrap()
                .to_string(),
        );
    }
    let (calm, flagged) = (ids[0].clone(), ids[1].clone());

    let listed = |body: &Value, id: &str| {
        body.as_array()
            .unwrap()
            .iter()
            .any(|row| row["experience_id"] == id)
    };

    let resp = app
        .router()
        .oneshot(request(
            Method::GET,
            "/v1/public-experiences?limit=100",
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert!(!listed(&body, &calm));

    for id in &ids {
        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                &format!("/v1/moderation/experiences/{id}/approve"),
                Some(&moderator.jwt),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app
        .router()
        .oneshot(request(
            Method::GET,
            "/v1/public-experiences?limit=100",
            None,
            None,
        ))
        .await
        .unwrap();
    let body = parse_body(resp).await;
    assert!(listed(&body, &calm));
    assert!(listed(&body, &flagged));
    assert!(body[0].get("member_id").is_none());

    let resp = app
        .router()
        .oneshot(request(
            Method::GET,
            "/v1/public-experiences?drug=true&limit=100",
            None,
            None,
        ))
        .await
        .unwrap();
    let body = parse_body(resp).await;
    assert!(listed(&body, &calm));
    assert!(!listed(&body, &flagged));

    app.cleanup().await.unwrap();
}
