//! Test helpers and utilities for unit and integration testing.
//!
//! Sets up in-memory databases and fixture rows shared by the `#[cfg(test)]`
//! modules and the endpoint tests under `tests/`.

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;

use crate::migrations::Migrator;
use crate::models::step::{StepKind, StepPayload, VideoPayload};
use crate::models::user_challenge_step::StepState;
use crate::models::{admin, challenge, game, step, user, user_challenge, user_challenge_step};
use crate::services::security::hash_password;

/// Create an in-memory SQLite database with the full schema applied.
pub async fn create_test_db() -> DatabaseConnection {
    // Each connection gets its own database
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Create a test user with a 1000.00 starting balance.
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
) -> user::Model {
    let now = chrono::Utc::now();

    let new_user = user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        hashed_password: Set(hash_password(password).unwrap()),
        balance: Set(Decimal::new(1000_00, 2)),
        points: Set(0),
        avatar_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_user.insert(db).await.unwrap()
}

pub async fn create_test_admin(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
) -> admin::Model {
    let new_admin = admin::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        hashed_password: Set(hash_password(password).unwrap()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_admin.insert(db).await.unwrap()
}

pub async fn create_test_challenge(
    db: &DatabaseConnection,
    number: i32,
    name: &str,
) -> challenge::Model {
    let new_challenge = challenge::ActiveModel {
        number: Set(number),
        name: Set(name.to_string()),
        description: Set(format!("Learn about {name}")),
        image_url: Set(None),
        ..Default::default()
    };

    new_challenge.insert(db).await.unwrap()
}

/// Attach a video step to a challenge.
pub async fn create_test_step(db: &DatabaseConnection, challenge_id: i64) -> step::Model {
    let payload = StepPayload::Video(VideoPayload {
        url: "https://videos.example.com/intro.mp4".to_string(),
        duration_secs: Some(90),
    });

    let new_step = step::ActiveModel {
        challenge_id: Set(challenge_id),
        kind: Set(StepKind::Video),
        payload: Set(payload.to_value().unwrap()),
        ..Default::default()
    };

    new_step.insert(db).await.unwrap()
}

/// Enroll a user in a challenge (unblocked, 0%) and seed a not-started
/// progress row for every step the challenge currently has.
pub async fn enroll_user(
    db: &DatabaseConnection,
    user_id: i64,
    challenge_id: i64,
) -> user_challenge::Model {
    let enrollment = user_challenge::ActiveModel {
        user_id: Set(user_id),
        challenge_id: Set(challenge_id),
        progress_percentage: Set(0),
        completed: Set(false),
        blocked: Set(false),
        detail_seen: Set(false),
        ..Default::default()
    };
    let created = enrollment.insert(db).await.unwrap();

    let steps = step::Entity::find()
        .filter(step::Column::ChallengeId.eq(challenge_id))
        .all(db)
        .await
        .unwrap();
    for s in steps {
        let row = user_challenge_step::ActiveModel {
            user_id: Set(user_id),
            challenge_id: Set(challenge_id),
            step_id: Set(s.id),
            state: Set(StepState::NotStarted),
            ..Default::default()
        };
        row.insert(db).await.unwrap();
    }

    created
}

/// Create an ongoing game scheduled one day out.
pub async fn create_test_game(
    db: &DatabaseConnection,
    home_team: &str,
    away_team: &str,
) -> game::Model {
    let new_game = game::ActiveModel {
        home_team: Set(home_team.to_string()),
        away_team: Set(away_team.to_string()),
        scheduled_at: Set(chrono::Utc::now() + chrono::Duration::days(1)),
        home_score: Set(None),
        away_score: Set(None),
        game_state: Set(game::GameState::Ongoing),
        ..Default::default()
    };

    new_game.insert(db).await.unwrap()
}
