//! Users endpoint integration tests
//!
//! Covers:
//! - `GET /api/users` — admin listing
//! - `GET /api/users/{id}` — self-or-admin ownership rule
//! - `PATCH /api/users/{id}` — profile updates
//! - `POST /api/users/{id}/balance` — admin balance adjustment
//! - `PATCH /api/users/{id}/points` — admin points adjustment

use axum::http::StatusCode;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

mod common;
use common::{admin_token, api_get, api_patch, api_post, build_test_app, dec, user_token};
use rust_decimal::Decimal;

use betclass::models::admin_notification;
use betclass::models::prelude::AdminNotification;
use betclass::test_helpers::{create_test_admin, create_test_user};

#[tokio::test]
async fn user_can_read_own_profile() {
    let (app, db) = build_test_app().await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;

    let (status, body) = api_get(
        app,
        &format!("/api/users/{}", user.id),
        &user_token(user.id),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "lia@example.com");
}

#[tokio::test]
async fn foreign_profile_is_forbidden_and_leaks_nothing() {
    let (app, db) = build_test_app().await;
    let owner = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
    let intruder = create_test_user(&db, "Eve", "eve@example.com", "password123").await;

    let (status, body) = api_get(
        app,
        &format!("/api/users/{}", owner.id),
        &user_token(intruder.id),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn admin_can_read_any_profile() {
    let (app, db) = build_test_app().await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
    let admin = create_test_admin(&db, "Root", "root@example.com", "password123").await;

    let (status, _) = api_get(
        app,
        &format!("/api/users/{}", user.id),
        &admin_token(admin.id),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn listing_users_requires_admin() {
    let (app, db) = build_test_app().await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;

    let (status, _) = api_get(app.clone(), "/api/users", &user_token(user.id)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = create_test_admin(&db, "Root", "root@example.com", "password123").await;
    let (status, body) = api_get(app, "/api/users", &admin_token(admin.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn user_can_update_own_name() {
    let (app, db) = build_test_app().await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;

    let (status, body) = api_patch(
        app,
        &format!("/api/users/{}", user.id),
        &user_token(user.id),
        json!({"name": "Lia Santos"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Lia Santos");
}

#[tokio::test]
async fn balance_adjustment_records_notification() {
    let (app, db) = build_test_app().await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
    let admin = create_test_admin(&db, "Root", "root@example.com", "password123").await;

    let (status, body) = api_post(
        app,
        &format!("/api/users/{}/balance", user.id),
        &admin_token(admin.id),
        json!({"amount": "500.00", "reason": "weekly top-up"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec(&body["data"]["balance"]), Decimal::new(1500_00, 2));

    let notifications = AdminNotification::find()
        .filter(admin_notification::Column::Source.eq("balance-topup"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
}

#[tokio::test]
async fn balance_cannot_go_negative() {
    let (app, db) = build_test_app().await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
    let admin = create_test_admin(&db, "Root", "root@example.com", "password123").await;

    let (status, _) = api_post(
        app,
        &format!("/api/users/{}/balance", user.id),
        &admin_token(admin.id),
        json!({"amount": "-2000.00"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn balance_adjustment_requires_admin() {
    let (app, db) = build_test_app().await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;

    let (status, _) = api_post(
        app,
        &format!("/api/users/{}/balance", user.id),
        &user_token(user.id),
        json!({"amount": "500.00"}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn points_adjustment_applies_delta() {
    let (app, db) = build_test_app().await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
    let admin = create_test_admin(&db, "Root", "root@example.com", "password123").await;

    let (status, body) = api_patch(
        app,
        &format!("/api/users/{}/points", user.id),
        &admin_token(admin.id),
        json!({"delta": 25}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["points"], 25);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let (app, db) = build_test_app().await;
    let admin = create_test_admin(&db, "Root", "root@example.com", "password123").await;

    let (status, _) = api_get(app, "/api/users/9999", &admin_token(admin.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
