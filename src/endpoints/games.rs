//! Fixture catalogue.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::{ensure_admin, Principal};
use crate::models::game::{self, GameState};
use crate::models::prelude::*;
use crate::schemas::Envelope;
use crate::state::AppState;

pub fn games_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_games).post(create_game))
        .route(
            "/{game_id}",
            get(get_game).patch(update_game).delete(delete_game),
        )
        .route("/{game_id}/finish", patch(finish_game))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub state: Option<GameState>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub home_team: String,
    pub away_team: String,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGameRequest {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct FinishGameRequest {
    pub home_score: i32,
    pub away_score: i32,
}

async fn list_games(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<game::Model>>> {
    let mut query = Game::find().order_by_asc(game::Column::ScheduledAt);
    if let Some(game_state) = params.state {
        query = query.filter(game::Column::GameState.eq(game_state));
    }

    let games = query
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Envelope::ok("Games retrieved", games))
}

async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
) -> Result<Envelope<game::Model>> {
    let found = find_game(&state, game_id).await?;
    Ok(Envelope::ok("Game retrieved", found))
}

async fn create_game(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<Envelope<game::Model>> {
    ensure_admin(&principal)?;

    if payload.home_team.trim().is_empty() || payload.away_team.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Both team names are required".to_string(),
        ));
    }
    if payload.home_team.trim() == payload.away_team.trim() {
        return Err(AppError::BadRequest(
            "A game needs two distinct teams".to_string(),
        ));
    }

    let new_game = game::ActiveModel {
        home_team: Set(payload.home_team.trim().to_string()),
        away_team: Set(payload.away_team.trim().to_string()),
        scheduled_at: Set(payload.scheduled_at),
        home_score: Set(None),
        away_score: Set(None),
        game_state: Set(GameState::Ongoing),
        ..Default::default()
    };
    let created = new_game.insert(&state.db).await?;

    tracing::info!(game_id = created.id, "Game created");
    Ok(Envelope::created("Game created", created))
}

async fn update_game(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(game_id): Path<i64>,
    Json(payload): Json<UpdateGameRequest>,
) -> Result<Envelope<game::Model>> {
    ensure_admin(&principal)?;

    let found = find_game(&state, game_id).await?;

    let mut model: game::ActiveModel = found.into();
    if let Some(home_team) = payload.home_team {
        if home_team.trim().is_empty() {
            return Err(AppError::BadRequest("Home team must not be empty".to_string()));
        }
        model.home_team = Set(home_team.trim().to_string());
    }
    if let Some(away_team) = payload.away_team {
        if away_team.trim().is_empty() {
            return Err(AppError::BadRequest("Away team must not be empty".to_string()));
        }
        model.away_team = Set(away_team.trim().to_string());
    }
    if let Some(scheduled_at) = payload.scheduled_at {
        model.scheduled_at = Set(scheduled_at);
    }

    let updated = model.update(&state.db).await?;
    Ok(Envelope::ok("Game updated", updated))
}

/// PATCH /api/games/{game_id}/finish — record the final score.
async fn finish_game(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(game_id): Path<i64>,
    Json(payload): Json<FinishGameRequest>,
) -> Result<Envelope<game::Model>> {
    ensure_admin(&principal)?;

    if payload.home_score < 0 || payload.away_score < 0 {
        return Err(AppError::BadRequest("Scores must not be negative".to_string()));
    }

    let found = find_game(&state, game_id).await?;
    if found.game_state == GameState::Finished {
        return Err(AppError::Conflict("Game is already finished".to_string()));
    }

    let mut model: game::ActiveModel = found.into();
    model.home_score = Set(Some(payload.home_score));
    model.away_score = Set(Some(payload.away_score));
    model.game_state = Set(GameState::Finished);
    let updated = model.update(&state.db).await?;

    tracing::info!(game_id, "Game finished");
    Ok(Envelope::ok("Game finished", updated))
}

async fn delete_game(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(game_id): Path<i64>,
) -> Result<Envelope<()>> {
    ensure_admin(&principal)?;

    let found = find_game(&state, game_id).await?;
    found.delete(&state.db).await?;

    tracing::info!(game_id, "Game deleted");
    Ok(Envelope::message("Game deleted"))
}

async fn find_game(state: &AppState, game_id: i64) -> Result<game::Model> {
    Game::find_by_id(game_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".to_string()))
}
