#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use quill_ai::{ProviderGateway, ProviderRegistry};
use quill_server::{
    api::app_router,
    auth::{AuthConfig, AuthManager},
    build_state_with_registry,
    config::Config,
};
use tempfile::TempDir;

const TEST_SECRET: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

pub struct TestApp {
    pub router: Router,
    pub auth: AuthManager,
    _dir: TempDir,
}

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_SECRET.to_vec(),
        access_token_ttl: Duration::from_secs(300),
    }
}

fn test_config(dir: &TempDir, auth: Option<AuthConfig>) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.path().join("test.db").to_string_lossy().into_owned(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        auth,
        ai_provider: None,
        ai_model: None,
        ai_timeout: Duration::from_secs(5),
    }
}

/// Build the full router with `gateway` registered as the default provider.
pub async fn build_app(gateway: Option<Arc<dyn ProviderGateway>>) -> TestApp {
    build_app_with_auth(gateway, Some(auth_config())).await
}

pub async fn build_app_with_auth(
    gateway: Option<Arc<dyn ProviderGateway>>,
    auth: Option<AuthConfig>,
) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir, auth);

    let mut registry = ProviderRegistry::new();
    if let Some(gateway) = gateway {
        let id = gateway.provider_id().to_string();
        registry.register(gateway);
        registry.set_default(&id).unwrap();
    }

    let state = build_state_with_registry(&config, registry).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        auth: AuthManager::new(&auth_config()).unwrap(),
        _dir: dir,
    }
}

impl TestApp {
    pub fn token(&self, user_id: &str) -> String {
        self.auth.issue_token(user_id).unwrap()
    }

    pub fn request(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token(user_id)),
            );
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
