mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
};
use common::{build_app, json_body};
use quill_ai::StubProvider;
use tower::ServiceExt;

#[tokio::test]
async fn health_endpoints_are_public() {
    let app = build_app(None).await;

    for uri in ["/api/v2/healthz", "/api/v2/readyz"] {
        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = build_app(None).await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v2/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn providers_listing_marks_the_default() {
    let app = build_app(Some(Arc::new(StubProvider::replying(
        "openai", "Hi", "gpt-4o",
    ))))
    .await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(Method::GET, "/api/v2/ai/providers", Some("user-1"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let providers = body.as_array().unwrap();
    assert!(providers.len() >= 5);

    let openai = providers.iter().find(|p| p["id"] == "openai").unwrap();
    assert_eq!(openai["isDefault"], true);
    assert_eq!(openai["available"], true);
    assert!(openai.get("apiKey").is_none());

    let anthropic = providers.iter().find(|p| p["id"] == "anthropic").unwrap();
    assert_eq!(anthropic["isDefault"], false);
    assert_eq!(anthropic["available"], false);
}

#[tokio::test]
async fn templates_are_scoped_to_their_owner() {
    let app = build_app(None).await;

    let created = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/templates",
            Some("owner"),
            Some(serde_json::json!({ "name": "Summary", "content": "Be brief." })),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let record = json_body(created).await;
    let id = record["id"].as_str().unwrap().to_string();
    assert_eq!(record["name"], "Summary");

    let listed = app
        .router
        .clone()
        .oneshot(app.request(Method::GET, "/api/v2/templates", Some("owner"), None))
        .await
        .unwrap();
    assert_eq!(json_body(listed).await.as_array().unwrap().len(), 1);

    let others = app
        .router
        .clone()
        .oneshot(app.request(Method::GET, "/api/v2/templates", Some("someone"), None))
        .await
        .unwrap();
    assert!(json_body(others).await.as_array().unwrap().is_empty());

    let uri = format!("/api/v2/templates/{id}");
    let foreign_delete = app
        .router
        .clone()
        .oneshot(app.request(Method::DELETE, &uri, Some("someone"), None))
        .await
        .unwrap();
    assert_eq!(foreign_delete.status(), StatusCode::NOT_FOUND);

    let deleted = app
        .router
        .clone()
        .oneshot(app.request(Method::DELETE, &uri, Some("owner"), None))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn template_without_name_is_rejected() {
    let app = build_app(None).await;
    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/templates",
            Some("owner"),
            Some(serde_json::json!({ "name": "  ", "content": "x" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
