//! Shared helpers for endpoint integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use betclass::config::CONFIG;
use betclass::endpoints::create_router;
use betclass::services::generator::{ChampionshipGenerator, ContentProvider, ProviderError};
use betclass::services::security::Role;
use betclass::state::AppState;
use betclass::test_helpers::create_test_db;

/// Provider that always fails; for tests that never reach the generator.
pub struct UnreachableProvider;

#[async_trait]
impl ContentProvider for UnreachableProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Http("no provider in this test".to_string()))
    }
}

/// Provider that replays a fixed response for every call.
pub struct FixedProvider(pub String);

#[async_trait]
impl ContentProvider for FixedProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Ok(self.0.clone())
    }
}

/// Build an app over a fresh in-memory database.
pub async fn build_test_app() -> (Router, DatabaseConnection) {
    build_test_app_with_provider(UnreachableProvider).await
}

pub async fn build_test_app_with_provider(
    provider: impl ContentProvider + 'static,
) -> (Router, DatabaseConnection) {
    let db = create_test_db().await;
    let state = AppState::new(db.clone(), ChampionshipGenerator::new(provider));
    (create_router(state), db)
}

/// Parse a JSON money field regardless of string/number encoding.
pub fn dec(value: &Value) -> rust_decimal::Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.to_string().parse().unwrap(),
        other => panic!("not a decimal value: {other:?}"),
    }
}

pub fn user_token(id: i64) -> String {
    betclass::services::create_access_token(id, Role::User).unwrap()
}

pub fn admin_token(id: i64) -> String {
    betclass::services::create_access_token(id, Role::Admin).unwrap()
}

fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("x-api-key", CONFIG.auth.user_api_key.as_str());

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or(json!(null))
    };
    (status, body)
}

pub async fn api_get(app: Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, request("GET", uri, Some(token), None)).await
}

pub async fn api_post(
    app: Router,
    uri: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    send(app, request("POST", uri, Some(token), Some(body))).await
}

pub async fn api_patch(
    app: Router,
    uri: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    send(app, request("PATCH", uri, Some(token), Some(body))).await
}

pub async fn api_delete(app: Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, request("DELETE", uri, Some(token), None)).await
}

/// Unauthenticated (no bearer token) request, still carrying the API key.
pub async fn public_post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, request("POST", uri, None, Some(body))).await
}

/// GET without the API key header or a token.
pub async fn keyless_get(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// Request without the API key header.
pub async fn keyless_post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}
