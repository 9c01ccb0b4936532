//! Simulated bets placed with platform balance.

use axum::{
    extract::{Extension, Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::{ensure_admin, ensure_self_or_admin, Principal};
use crate::models::bet::{BetResult, BetState};
use crate::models::prelude::*;
use crate::models::{bet, bet_game, user};
use crate::schemas::Envelope;
use crate::state::AppState;

pub fn bets_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_bet))
        .route("/{bet_id}", get(get_bet))
        .route("/{bet_id}/settle", patch(settle_bet))
        .with_state(state)
}

/// User-scoped bet listing, merged into the /users router.
pub fn user_bets_routes(state: AppState) -> Router {
    Router::new()
        .route("/{user_id}/bets", get(list_user_bets))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBetRequest {
    pub amount: Decimal,
    pub odds: Decimal,
    pub game_ids: Vec<i64>,
    pub championship_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SettleBetRequest {
    pub result: BetResult,
}

#[derive(Debug, Serialize)]
pub struct BetWithGames {
    #[serde(flatten)]
    pub bet: bet::Model,
    pub games: Vec<bet_game::Model>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/bets — place a bet with the caller's own balance.
async fn create_bet(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateBetRequest>,
) -> Result<Envelope<BetWithGames>> {
    if payload.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("Amount must be positive".to_string()));
    }
    if payload.odds <= Decimal::ONE {
        return Err(AppError::BadRequest(
            "Odds must be greater than 1.0".to_string(),
        ));
    }
    if payload.game_ids.is_empty() {
        return Err(AppError::BadRequest(
            "A bet must reference at least one game".to_string(),
        ));
    }

    for game_id in &payload.game_ids {
        if Game::find_by_id(*game_id).one(&state.db).await?.is_none() {
            return Err(AppError::NotFound(format!("Game {} not found", game_id)));
        }
    }
    if let Some(championship_id) = payload.championship_id {
        if Championship::find_by_id(championship_id)
            .one(&state.db)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Championship not found".to_string()));
        }
    }

    let bettor = User::find_by_id(principal.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    if bettor.balance < payload.amount {
        return Err(AppError::BadRequest("Insufficient balance".to_string()));
    }

    let txn = state.db.begin().await?;

    let mut bettor_model: user::ActiveModel = bettor.clone().into();
    bettor_model.balance = Set(bettor.balance - payload.amount);
    bettor_model.updated_at = Set(Utc::now());
    bettor_model.update(&txn).await?;

    let new_bet = bet::ActiveModel {
        user_id: Set(principal.id),
        amount: Set(payload.amount),
        odds: Set(payload.odds),
        potential_payoff: Set(payload.amount * payload.odds),
        state: Set(BetState::Pending),
        result: Set(BetResult::Pending),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = new_bet.insert(&txn).await?;

    let mut games = Vec::with_capacity(payload.game_ids.len());
    for game_id in payload.game_ids {
        let link = bet_game::ActiveModel {
            bet_id: Set(created.id),
            game_id: Set(game_id),
            championship_id: Set(payload.championship_id),
            ..Default::default()
        };
        games.push(link.insert(&txn).await?);
    }

    txn.commit().await?;

    tracing::info!(bet_id = created.id, user_id = principal.id, "Bet placed");
    Ok(Envelope::created(
        "Bet created",
        BetWithGames {
            bet: created,
            games,
        },
    ))
}

/// GET /api/bets/{bet_id} — owner or admin.
async fn get_bet(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(bet_id): Path<i64>,
) -> Result<Envelope<BetWithGames>> {
    let found = find_bet(&state, bet_id).await?;
    ensure_self_or_admin(&principal, found.user_id)?;

    let games = BetGame::find()
        .filter(bet_game::Column::BetId.eq(found.id))
        .all(&state.db)
        .await?;

    Ok(Envelope::ok("Bet retrieved", BetWithGames { bet: found, games }))
}

/// GET /api/users/{user_id}/bets
async fn list_user_bets(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> Result<Envelope<Vec<bet::Model>>> {
    ensure_self_or_admin(&principal, user_id)?;

    let bets = Bet::find()
        .filter(bet::Column::UserId.eq(user_id))
        .order_by_desc(bet::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Envelope::ok("Bets retrieved", bets))
}

/// PATCH /api/bets/{bet_id}/settle — admin resolves a pending bet.
async fn settle_bet(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(bet_id): Path<i64>,
    Json(payload): Json<SettleBetRequest>,
) -> Result<Envelope<bet::Model>> {
    ensure_admin(&principal)?;

    if payload.result == BetResult::Pending {
        return Err(AppError::BadRequest(
            "Settlement result must be won or lost".to_string(),
        ));
    }

    let found = find_bet(&state, bet_id).await?;
    if found.state == BetState::Settled {
        return Err(AppError::Conflict("Bet is already settled".to_string()));
    }

    let txn = state.db.begin().await?;

    if payload.result == BetResult::Won {
        let bettor = User::find_by_id(found.user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let payoff = found.potential_payoff;
        let mut bettor_model: user::ActiveModel = bettor.clone().into();
        bettor_model.balance = Set(bettor.balance + payoff);
        bettor_model.updated_at = Set(Utc::now());
        bettor_model.update(&txn).await?;
    }

    let mut model: bet::ActiveModel = found.into();
    model.state = Set(BetState::Settled);
    model.result = Set(payload.result);
    let updated = model.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(bet_id, result = ?updated.result, "Bet settled");
    Ok(Envelope::ok("Bet settled", updated))
}

async fn find_bet(state: &AppState, bet_id: i64) -> Result<bet::Model> {
    Bet::find_by_id(bet_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Bet not found".to_string()))
}
