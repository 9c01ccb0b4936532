//! Championship endpoint integration tests
//!
//! Drives the generation endpoint with scripted providers so no network is
//! involved.

use axum::http::StatusCode;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};

mod common;
use common::{
    admin_token, api_get, api_post, build_test_app_with_provider, user_token, FixedProvider,
    UnreachableProvider,
};

use betclass::models::prelude::Championship;
use betclass::test_helpers::{create_test_admin, create_test_user};

fn valid_document() -> Value {
    let classification: Vec<Value> = (1..=18i64)
        .map(|position| {
            json!({
                "position": position,
                "team": format!("Internacional de Itu {position}"),
                "points": 50 - position,
                "played": 20,
                "wins": 10,
                "draws": 5,
                "losses": 5,
                "goals_for": 28,
                "goals_against": 19,
                "goal_difference": 9,
                "form": ["V", "V", "E", "D", "V"],
            })
        })
        .collect();
    let games: Vec<Value> = (0..9)
        .map(|i| {
            json!({
                "home_team": format!("Internacional de Itu {}", 2 * i + 1),
                "away_team": format!("Internacional de Itu {}", 2 * i + 2),
                "schedule": "19:45",
                "odds": { "1": 1.9, "x": 3.1, "2": 4.2 },
            })
        })
        .collect();

    json!({
        "championship_id": "serie-z-2025",
        "championship_name": "Serie Z",
        "round": 7,
        "generated_at": "2025-09-01T12:00:00Z",
        "classification": classification,
        "games": games,
    })
}

#[tokio::test]
async fn generation_persists_and_returns_the_document() {
    let provider = FixedProvider(format!("Here it is:\n{}", valid_document()));
    let (app, db) = build_test_app_with_provider(provider).await;
    let admin = create_test_admin(&db, "Root", "root@example.com", "password123").await;

    let (status, body) = api_post(
        app,
        "/api/championships/generate",
        &admin_token(admin.id),
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["data"]["championship_name"], "Serie Z");
    assert_eq!(Championship::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn generation_requires_admin() {
    let (app, db) = build_test_app_with_provider(UnreachableProvider).await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;

    let (status, _) = api_post(
        app,
        "/api/championships/generate",
        &user_token(user.id),
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(Championship::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_generations_exhaust_attempts() {
    // Always returns a document with too few games
    let mut broken = valid_document();
    broken["games"].as_array_mut().unwrap().pop();
    let (app, db) = build_test_app_with_provider(FixedProvider(broken.to_string())).await;
    let admin = create_test_admin(&db, "Root", "root@example.com", "password123").await;

    let (status, body) = api_post(
        app,
        "/api/championships/generate",
        &admin_token(admin.id),
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(Championship::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn stored_championships_are_listed_newest_first() {
    let provider = FixedProvider(valid_document().to_string());
    let (app, db) = build_test_app_with_provider(provider).await;
    let admin = create_test_admin(&db, "Root", "root@example.com", "password123").await;
    let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
    let token = admin_token(admin.id);

    api_post(app.clone(), "/api/championships/generate", &token, json!({})).await;
    api_post(app.clone(), "/api/championships/generate", &token, json!({})).await;

    let (status, body) = api_get(app.clone(), "/api/championships", &user_token(user.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let id = body["data"][0]["id"].as_i64().unwrap();
    let (status, body) = api_get(
        app,
        &format!("/api/championships/{}", id),
        &user_token(user.id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["data"]["classification"].as_array().unwrap().len(),
        18
    );
}
