mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{build_app, build_app_with_auth, json_body};
use quill_ai::{
    ProviderErrorKind, ProviderFailure, StubProvider, INTERNAL_ERROR_MESSAGE,
    SERVICE_UNAVAILABLE_MESSAGE,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn chat_requires_a_token() {
    let app = build_app(Some(Arc::new(StubProvider::replying(
        "stub", "Hi", "stub-model",
    ))))
    .await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/ai/chat",
            None,
            Some(json!({ "message": "Hello" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chat_is_rejected_when_auth_is_not_configured() {
    let app = build_app_with_auth(
        Some(Arc::new(StubProvider::replying("stub", "Hi", "stub-model"))),
        None,
    )
    .await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/ai/chat",
            Some("user-1"),
            Some(json!({ "message": "Hello" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chat_returns_provider_reply() {
    let stub = Arc::new(StubProvider::replying(
        "stub",
        "Hello! How can I help?",
        "stub-model",
    ));
    let app = build_app(Some(stub.clone())).await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/ai/chat",
            Some("user-1"),
            Some(json!({
                "message": "Hello",
                "history": [
                    { "role": "user", "content": "Hi" },
                    { "role": "assistant", "content": "Hey there" }
                ]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["response"], "Hello! How can I help?");
    assert_eq!(body["modelUsed"], "stub-model");
    assert!(body["processingTimeMs"].is_u64());

    let prompt = stub.last_prompt().unwrap();
    assert_eq!(prompt.turns.len(), 3);
    assert!(!prompt.template_applied);
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn chat_rejects_empty_message() {
    let stub = Arc::new(StubProvider::replying("stub", "Hi", "stub-model"));
    let app = build_app(Some(stub.clone())).await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/ai/chat",
            Some("user-1"),
            Some(json!({ "message": "   " })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn chat_rejects_malformed_history() {
    let app = build_app(Some(Arc::new(StubProvider::replying(
        "stub", "Hi", "stub-model",
    ))))
    .await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/ai/chat",
            Some("user-1"),
            Some(json!({
                "message": "Hello",
                "history": [{ "role": "user", "content": "" }]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_reports_service_unavailable() {
    let stub = Arc::new(StubProvider::replying("stub", "Hi", "stub-model").unavailable());
    let app = build_app(Some(stub.clone())).await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/ai/chat",
            Some("user-1"),
            Some(json!({ "message": "Hello" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = json_body(response).await;
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(body["detail"], SERVICE_UNAVAILABLE_MESSAGE);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn chat_without_any_provider_is_unavailable() {
    let app = build_app(None).await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/ai/chat",
            Some("user-1"),
            Some(json!({ "message": "Hello" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn chat_surfaces_provider_failure_detail() {
    let app = build_app(Some(Arc::new(StubProvider::failing(
        "stub",
        ProviderFailure::with_message(ProviderErrorKind::Quota, "Rate limit exceeded"),
    ))))
    .await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/ai/chat",
            Some("user-1"),
            Some(json!({ "message": "Hello" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["code"], "PROVIDER_QUOTA_EXCEEDED");
    assert_eq!(
        body["detail"],
        format!("{}: Rate limit exceeded", INTERNAL_ERROR_MESSAGE)
    );
}

#[tokio::test]
async fn chat_applies_owned_template_only() {
    let stub = Arc::new(StubProvider::replying("stub", "Done", "stub-model"));
    let app = build_app(Some(stub.clone())).await;

    let created = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/templates",
            Some("owner"),
            Some(json!({ "name": "Pirate", "content": "Talk like a pirate." })),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let template_id = json_body(created).await["id"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/ai/chat",
            Some("owner"),
            Some(json!({ "message": "Hello", "templateId": template_id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let prompt = stub.last_prompt().unwrap();
    assert!(prompt.template_applied);
    assert_eq!(prompt.system_context(), Some("Talk like a pirate."));

    // Another user naming the same template gets a plain prompt.
    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::POST,
            "/api/v2/ai/chat",
            Some("intruder"),
            Some(json!({ "message": "Hello", "templateId": template_id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let prompt = stub.last_prompt().unwrap();
    assert!(!prompt.template_applied);
    assert_eq!(prompt.turns.len(), 1);
}
