//! Signup and login flow tests
//!
//! Covers:
//! - `POST /api/users` — public signup behind the API key
//! - `POST /api/auth/login` — user login
//! - `POST /api/auth/admin/login` — admin login
//! - API-key gating of public routes

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{build_test_app, keyless_get, keyless_post, public_post};

use betclass::test_helpers::{create_test_admin, create_test_user};

#[tokio::test]
async fn signup_creates_user_with_starting_balance() {
    let (app, _db) = build_test_app().await;

    let (status, body) = public_post(
        app,
        "/api/users",
        json!({
            "name": "Lia",
            "email": "lia@example.com",
            "password": "password123"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["data"]["email"], "lia@example.com");
    assert_eq!(body["data"]["points"], 0);
    // Password hash is never serialized
    assert!(body["data"].get("hashed_password").is_none());
}

#[tokio::test]
async fn signup_rejects_duplicate_email() {
    let (app, db) = build_test_app().await;
    create_test_user(&db, "Lia", "lia@example.com", "password123").await;

    let (status, body) = public_post(
        app,
        "/api/users",
        json!({
            "name": "Other",
            "email": "lia@example.com",
            "password": "password123"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 409);
}

#[tokio::test]
async fn signup_rejects_short_password() {
    let (app, _db) = build_test_app().await;

    let (status, _) = public_post(
        app,
        "/api/users",
        json!({
            "name": "Lia",
            "email": "lia@example.com",
            "password": "short"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_returns_bearer_token() {
    let (app, db) = build_test_app().await;
    create_test_user(&db, "Lia", "lia@example.com", "password123").await;

    let (status, body) = public_post(
        app,
        "/api/auth/login",
        json!({"email": "lia@example.com", "password": "password123"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "bearer");
    assert!(body["data"]["access_token"].as_str().unwrap().len() > 20);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let (app, db) = build_test_app().await;
    create_test_user(&db, "Lia", "lia@example.com", "password123").await;

    let (status, body) = public_post(
        app,
        "/api/auth/login",
        json!({"email": "lia@example.com", "password": "wrong password"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn login_with_unknown_email_is_unauthorized() {
    let (app, _db) = build_test_app().await;

    let (status, _) = public_post(
        app,
        "/api/auth/login",
        json!({"email": "nobody@example.com", "password": "password123"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_login_works() {
    let (app, db) = build_test_app().await;
    create_test_admin(&db, "Root", "root@example.com", "password123").await;

    let (status, body) = public_post(
        app,
        "/api/auth/admin/login",
        json!({"email": "root@example.com", "password": "password123"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access_token"].is_string());
}

#[tokio::test]
async fn login_accepts_the_email_case_used_at_signup() {
    let (app, _db) = build_test_app().await;

    let (status, _) = public_post(
        app.clone(),
        "/api/users",
        json!({
            "name": "Lia",
            "email": "Lia@Example.com",
            "password": "password123"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = public_post(
        app,
        "/api/auth/login",
        json!({"email": "Lia@Example.com", "password": "password123"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access_token"].is_string());
}

#[tokio::test]
async fn health_probe_needs_no_key_or_token() {
    let (app, _db) = build_test_app().await;

    let (status, _) = keyless_get(app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_api_key_is_rejected() {
    let (app, _db) = build_test_app().await;

    let (status, body) = keyless_post(
        app,
        "/api/auth/login",
        json!({"email": "lia@example.com", "password": "password123"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing API key");
}
