//! Challenge catalogue and per-user challenge progress.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{ensure_admin, ensure_self_or_admin, Principal};
use crate::models::prelude::*;
use crate::models::step::{StepKind, StepPayload};
use crate::models::user_challenge_step::StepState;
use crate::models::{challenge, step, user_challenge, user_challenge_step};
use crate::schemas::Envelope;
use crate::services::progress::{self, StepUpdateOutcome};
use crate::state::AppState;

pub fn challenges_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_challenges).post(create_challenge))
        .route("/full", post(create_full_challenge))
        .route(
            "/{challenge_id}",
            get(get_challenge)
                .patch(update_challenge)
                .delete(delete_challenge),
        )
        .with_state(state)
}

/// User-scoped progress routes, merged into the /users router.
pub fn user_challenge_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/{user_id}/challenges",
            get(list_user_challenges).post(enroll),
        )
        .route("/{user_id}/challenges/{challenge_id}/seen", patch(mark_seen))
        .route(
            "/{user_id}/challenges/{challenge_id}/steps/{step_id}",
            patch(update_step_state),
        )
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateChallengeRequest {
    #[validate(range(min = 1, message = "Number must be positive"))]
    pub number: i32,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStepBody {
    pub kind: StepKind,
    pub payload: serde_json::Value,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFullChallengeRequest {
    #[validate(nested)]
    pub challenge: CreateChallengeRequest,
    pub steps: Vec<CreateStepBody>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateChallengeRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub challenge_id: i64,
    /// Pre-seed a locked enrollment for a later challenge.
    #[serde(default)]
    pub blocked: bool,
}

#[derive(Debug, Serialize)]
pub struct ChallengeWithSteps {
    #[serde(flatten)]
    pub challenge: challenge::Model,
    pub steps: Vec<step::Model>,
}

#[derive(Debug, Serialize)]
pub struct UserChallengeEntry {
    pub progress: user_challenge::Model,
    pub challenge: Option<challenge::Model>,
}

#[derive(Debug, Deserialize)]
pub struct StepStateRequest {
    pub state: StepState,
}

#[derive(Debug, Serialize)]
pub struct StepUpdateResponse {
    pub step: user_challenge_step::Model,
    pub progress: Option<user_challenge::Model>,
    pub unblocked_next: bool,
}

// ============================================================================
// Challenge catalogue
// ============================================================================

async fn list_challenges(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<challenge::Model>>> {
    let challenges = Challenge::find()
        .order_by_asc(challenge::Column::Number)
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Envelope::ok("Challenges retrieved", challenges))
}

async fn get_challenge(
    State(state): State<AppState>,
    Path(challenge_id): Path<i64>,
) -> Result<Envelope<ChallengeWithSteps>> {
    let found = find_challenge(&state, challenge_id).await?;
    let steps = Step::find()
        .filter(step::Column::ChallengeId.eq(challenge_id))
        .order_by_asc(step::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Envelope::ok(
        "Challenge retrieved",
        ChallengeWithSteps {
            challenge: found,
            steps,
        },
    ))
}

async fn create_challenge(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateChallengeRequest>,
) -> Result<Envelope<challenge::Model>> {
    ensure_admin(&principal)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    ensure_number_free(&state, payload.number).await?;

    let new_challenge = challenge::ActiveModel {
        number: Set(payload.number),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        image_url: Set(payload.image_url),
        ..Default::default()
    };
    let created = new_challenge.insert(&state.db).await?;

    tracing::info!(challenge_id = created.id, number = created.number, "Challenge created");
    Ok(Envelope::created("Challenge created", created))
}

/// POST /api/challenges/full — challenge and steps in one transaction.
async fn create_full_challenge(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateFullChallengeRequest>,
) -> Result<Envelope<ChallengeWithSteps>> {
    ensure_admin(&principal)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    ensure_number_free(&state, payload.challenge.number).await?;

    // Validate every step payload before touching the database
    let mut parsed_steps = Vec::with_capacity(payload.steps.len());
    for body in payload.steps {
        let parsed = StepPayload::from_parts(body.kind, body.payload)?;
        parsed_steps.push((body.kind, parsed));
    }

    let txn = state.db.begin().await?;

    let new_challenge = challenge::ActiveModel {
        number: Set(payload.challenge.number),
        name: Set(payload.challenge.name.trim().to_string()),
        description: Set(payload.challenge.description.trim().to_string()),
        image_url: Set(payload.challenge.image_url),
        ..Default::default()
    };
    let created = new_challenge.insert(&txn).await?;

    let mut steps = Vec::with_capacity(parsed_steps.len());
    for (kind, parsed) in parsed_steps {
        let new_step = step::ActiveModel {
            challenge_id: Set(created.id),
            kind: Set(kind),
            payload: Set(parsed.to_value()?),
            ..Default::default()
        };
        steps.push(new_step.insert(&txn).await?);
    }

    txn.commit().await?;

    tracing::info!(
        challenge_id = created.id,
        steps = steps.len(),
        "Full challenge created"
    );
    Ok(Envelope::created(
        "Challenge created",
        ChallengeWithSteps {
            challenge: created,
            steps,
        },
    ))
}

async fn update_challenge(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(challenge_id): Path<i64>,
    Json(payload): Json<UpdateChallengeRequest>,
) -> Result<Envelope<challenge::Model>> {
    ensure_admin(&principal)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let found = find_challenge(&state, challenge_id).await?;

    let mut model: challenge::ActiveModel = found.into();
    if let Some(name) = payload.name {
        model.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        model.description = Set(description.trim().to_string());
    }
    if let Some(image_url) = payload.image_url {
        model.image_url = Set(Some(image_url));
    }

    let updated = model.update(&state.db).await?;
    Ok(Envelope::ok("Challenge updated", updated))
}

async fn delete_challenge(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(challenge_id): Path<i64>,
) -> Result<Envelope<()>> {
    ensure_admin(&principal)?;

    let found = find_challenge(&state, challenge_id).await?;
    found.delete(&state.db).await?;

    tracing::info!(challenge_id, "Challenge deleted");
    Ok(Envelope::message("Challenge deleted"))
}

// ============================================================================
// Per-user enrollment and progress
// ============================================================================

/// POST /api/users/{user_id}/challenges
async fn enroll(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(payload): Json<EnrollRequest>,
) -> Result<Envelope<user_challenge::Model>> {
    ensure_self_or_admin(&principal, user_id)?;

    let found = find_challenge(&state, payload.challenge_id).await?;

    // Reject duplicates, never upsert
    let existing = UserChallenge::find()
        .filter(user_challenge::Column::UserId.eq(user_id))
        .filter(user_challenge::Column::ChallengeId.eq(found.id))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "User is already enrolled in this challenge".to_string(),
        ));
    }

    let txn = state.db.begin().await?;

    let enrollment = user_challenge::ActiveModel {
        user_id: Set(user_id),
        challenge_id: Set(found.id),
        progress_percentage: Set(0),
        completed: Set(false),
        blocked: Set(payload.blocked),
        detail_seen: Set(false),
        ..Default::default()
    };
    let created = enrollment.insert(&txn).await?;

    let steps = Step::find()
        .filter(step::Column::ChallengeId.eq(found.id))
        .all(&txn)
        .await?;
    for s in steps {
        let row = user_challenge_step::ActiveModel {
            user_id: Set(user_id),
            challenge_id: Set(found.id),
            step_id: Set(s.id),
            state: Set(StepState::NotStarted),
            ..Default::default()
        };
        row.insert(&txn).await?;
    }

    txn.commit().await?;

    tracing::info!(user_id, challenge_id = found.id, "User enrolled in challenge");
    Ok(Envelope::created("Enrollment created", created))
}

/// GET /api/users/{user_id}/challenges
async fn list_user_challenges(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> Result<Envelope<Vec<UserChallengeEntry>>> {
    ensure_self_or_admin(&principal, user_id)?;

    let rows = UserChallenge::find()
        .filter(user_challenge::Column::UserId.eq(user_id))
        .find_also_related(Challenge)
        .all(&state.db)
        .await?;

    let entries = rows
        .into_iter()
        .map(|(progress, challenge)| UserChallengeEntry {
            progress,
            challenge,
        })
        .collect();

    Ok(Envelope::ok("User challenges retrieved", entries))
}

/// PATCH /api/users/{user_id}/challenges/{challenge_id}/seen
async fn mark_seen(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((user_id, challenge_id)): Path<(i64, i64)>,
) -> Result<Envelope<user_challenge::Model>> {
    ensure_self_or_admin(&principal, user_id)?;

    let row = UserChallenge::find()
        .filter(user_challenge::Column::UserId.eq(user_id))
        .filter(user_challenge::Column::ChallengeId.eq(challenge_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

    let mut model: user_challenge::ActiveModel = row.into();
    model.detail_seen = Set(true);
    let updated = model.update(&state.db).await?;

    Ok(Envelope::ok("Challenge marked as seen", updated))
}

/// PATCH /api/users/{user_id}/challenges/{challenge_id}/steps/{step_id}
async fn update_step_state(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((user_id, challenge_id, step_id)): Path<(i64, i64, i64)>,
    Json(payload): Json<StepStateRequest>,
) -> Result<Envelope<StepUpdateResponse>> {
    ensure_self_or_admin(&principal, user_id)?;

    let outcome =
        progress::update_step_state(&state.db, user_id, challenge_id, step_id, payload.state)
            .await?;

    let envelope = match outcome {
        StepUpdateOutcome::NoOp(step_row) => Envelope::ok(
            "Step already in the requested state",
            StepUpdateResponse {
                step: step_row,
                progress: None,
                unblocked_next: false,
            },
        ),
        StepUpdateOutcome::Updated {
            step: step_row,
            progress,
            unblocked_next,
        } => Envelope::ok(
            "Step state updated",
            StepUpdateResponse {
                step: step_row,
                progress: Some(progress),
                unblocked_next,
            },
        ),
    };

    Ok(envelope)
}

// ============================================================================
// Helpers
// ============================================================================

async fn find_challenge(state: &AppState, challenge_id: i64) -> Result<challenge::Model> {
    Challenge::find_by_id(challenge_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))
}

async fn ensure_number_free(state: &AppState, number: i32) -> Result<()> {
    let existing = Challenge::find()
        .filter(challenge::Column::Number.eq(number))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "A challenge numbered {} already exists",
            number
        )));
    }
    Ok(())
}
