//! Step catalogue (teaching units within a challenge).

use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::{ensure_admin, Principal};
use crate::models::prelude::*;
use crate::models::step::{StepKind, StepPayload};
use crate::models::step;
use crate::schemas::Envelope;
use crate::state::AppState;

pub fn steps_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_steps).post(create_step))
        .route(
            "/{step_id}",
            get(get_step).patch(update_step).delete(delete_step),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub challenge_id: Option<i64>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStepRequest {
    pub challenge_id: i64,
    pub kind: StepKind,
    pub payload: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStepRequest {
    pub kind: StepKind,
    pub payload: serde_json::Value,
}

async fn list_steps(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<step::Model>>> {
    let mut query = Step::find().order_by_asc(step::Column::Id);
    if let Some(challenge_id) = params.challenge_id {
        query = query.filter(step::Column::ChallengeId.eq(challenge_id));
    }

    let steps = query
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Envelope::ok("Steps retrieved", steps))
}

async fn get_step(
    State(state): State<AppState>,
    Path(step_id): Path<i64>,
) -> Result<Envelope<step::Model>> {
    let found = find_step(&state, step_id).await?;
    Ok(Envelope::ok("Step retrieved", found))
}

async fn create_step(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateStepRequest>,
) -> Result<Envelope<step::Model>> {
    ensure_admin(&principal)?;

    let challenge = Challenge::find_by_id(payload.challenge_id)
        .one(&state.db)
        .await?;
    if challenge.is_none() {
        return Err(AppError::NotFound("Challenge not found".to_string()));
    }

    let parsed = StepPayload::from_parts(payload.kind, payload.payload)?;

    let new_step = step::ActiveModel {
        challenge_id: Set(payload.challenge_id),
        kind: Set(payload.kind),
        payload: Set(parsed.to_value()?),
        ..Default::default()
    };
    let created = new_step.insert(&state.db).await?;

    tracing::info!(step_id = created.id, challenge_id = created.challenge_id, "Step created");
    Ok(Envelope::created("Step created", created))
}

async fn update_step(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(step_id): Path<i64>,
    Json(payload): Json<UpdateStepRequest>,
) -> Result<Envelope<step::Model>> {
    ensure_admin(&principal)?;

    let found = find_step(&state, step_id).await?;
    let parsed = StepPayload::from_parts(payload.kind, payload.payload)?;

    let mut model: step::ActiveModel = found.into();
    model.kind = Set(payload.kind);
    model.payload = Set(parsed.to_value()?);
    let updated = model.update(&state.db).await?;

    Ok(Envelope::ok("Step updated", updated))
}

async fn delete_step(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(step_id): Path<i64>,
) -> Result<Envelope<()>> {
    ensure_admin(&principal)?;

    let found = find_step(&state, step_id).await?;
    found.delete(&state.db).await?;

    tracing::info!(step_id, "Step deleted");
    Ok(Envelope::message("Step deleted"))
}

async fn find_step(state: &AppState, step_id: i64) -> Result<step::Model> {
    Step::find_by_id(step_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Step not found".to_string()))
}
