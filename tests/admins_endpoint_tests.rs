//! Admin account endpoint integration tests

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{admin_token, api_delete, api_get, api_post, build_test_app, user_token};

use betclass::test_helpers::{create_test_admin, create_test_user};

#[tokio::test]
async fn admin_crud_flow() {
    let (app, db) = build_test_app().await;
    let root = create_test_admin(&db, "Root", "root@example.com", "password123").await;
    let token = admin_token(root.id);

    let (status, body) = api_post(
        app.clone(),
        "/api/admins",
        &token,
        json!({"name": "Second", "email": "second@example.com", "password": "password123"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    // Duplicate email
    let (status, _) = api_post(
        app.clone(),
        "/api/admins",
        &token,
        json!({"name": "Clone", "email": "second@example.com", "password": "password123"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = api_get(app.clone(), "/api/admins", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = api_delete(app.clone(), &format!("/api/admins/{}", id), &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = api_get(app, &format!("/api/admins/{}", id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_routes_reject_user_tokens() {
    let (app, db) = build_test_app().await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;

    let (status, _) = api_get(app, "/api/admins", &user_token(user.id)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
