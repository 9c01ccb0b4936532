//! Questionnaire endpoint integration tests

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{admin_token, api_post, build_test_app, user_token};

use betclass::test_helpers::{create_test_admin, create_test_user};

async fn create_questionnaire(
    app: axum::Router,
    token: &str,
) -> i64 {
    let (status, body) = api_post(
        app,
        "/api/questionnaires",
        token,
        json!({
            "question": "Odds of 4.00 imply which probability?",
            "options": ["25%", "40%", "4%"],
            "correct_option": 0
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn answers_are_checked_against_the_correct_option() {
    let (app, db) = build_test_app().await;
    let admin = create_test_admin(&db, "Root", "root@example.com", "password123").await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
    let id = create_questionnaire(app.clone(), &admin_token(admin.id)).await;

    let (status, body) = api_post(
        app.clone(),
        &format!("/api/questionnaires/{}/answer", id),
        &user_token(user.id),
        json!({"option": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["correct"], true);

    let (status, body) = api_post(
        app.clone(),
        &format!("/api/questionnaires/{}/answer", id),
        &user_token(user.id),
        json!({"option": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["correct"], false);

    // Out-of-range answer
    let (status, _) = api_post(
        app,
        &format!("/api/questionnaires/{}/answer", id),
        &user_token(user.id),
        json!({"option": 7}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn creation_validates_option_bounds() {
    let (app, db) = build_test_app().await;
    let admin = create_test_admin(&db, "Root", "root@example.com", "password123").await;
    let token = admin_token(admin.id);

    // Too few options
    let (status, _) = api_post(
        app.clone(),
        "/api/questionnaires",
        &token,
        json!({"question": "Only one?", "options": ["yes"], "correct_option": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Correct option out of range
    let (status, _) = api_post(
        app.clone(),
        "/api/questionnaires",
        &token,
        json!({"question": "Which?", "options": ["a", "b"], "correct_option": 5}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
    let (status, _) = api_post(
        app,
        "/api/questionnaires",
        &user_token(user.id),
        json!({"question": "Which?", "options": ["a", "b"], "correct_option": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
