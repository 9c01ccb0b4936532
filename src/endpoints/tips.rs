//! Advisory tips. At most one tip is active at a time; activation always
//! deactivates the rest inside one transaction.

use axum::{
    extract::{Extension, Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::{ensure_admin, Principal};
use crate::models::prelude::*;
use crate::models::tip;
use crate::schemas::Envelope;
use crate::services::record_admin_notification;
use crate::state::AppState;

pub fn tips_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_tips).post(create_tip))
        .route("/active", get(get_active_tip))
        .route("/rotate", post(rotate_tip))
        .route(
            "/{tip_id}",
            get(get_tip).patch(update_tip).delete(delete_tip),
        )
        .route("/{tip_id}/state", patch(update_tip_state))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CreateTipRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTipRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct TipStateRequest {
    pub active: bool,
}

async fn list_tips(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Envelope<Vec<tip::Model>>> {
    ensure_admin(&principal)?;

    let tips = Tip::find()
        .order_by_asc(tip::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Envelope::ok("Tips retrieved", tips))
}

/// GET /api/tips/active — the tip currently shown to users.
async fn get_active_tip(State(state): State<AppState>) -> Result<Envelope<tip::Model>> {
    let active = Tip::find()
        .filter(tip::Column::Active.eq(true))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No active tip".to_string()))?;

    Ok(Envelope::ok("Active tip retrieved", active))
}

async fn get_tip(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tip_id): Path<i64>,
) -> Result<Envelope<tip::Model>> {
    ensure_admin(&principal)?;

    let found = find_tip(&state, tip_id).await?;
    Ok(Envelope::ok("Tip retrieved", found))
}

async fn create_tip(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateTipRequest>,
) -> Result<Envelope<tip::Model>> {
    ensure_admin(&principal)?;

    if payload.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content must not be empty".to_string()));
    }

    // New tips start inactive; activation goes through /state
    let new_tip = tip::ActiveModel {
        content: Set(payload.content.trim().to_string()),
        active: Set(false),
        ..Default::default()
    };
    let created = new_tip.insert(&state.db).await?;

    tracing::info!(tip_id = created.id, "Tip created");
    Ok(Envelope::created("Tip created", created))
}

async fn update_tip(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tip_id): Path<i64>,
    Json(payload): Json<UpdateTipRequest>,
) -> Result<Envelope<tip::Model>> {
    ensure_admin(&principal)?;

    if payload.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content must not be empty".to_string()));
    }

    let found = find_tip(&state, tip_id).await?;
    let mut model: tip::ActiveModel = found.into();
    model.content = Set(payload.content.trim().to_string());
    let updated = model.update(&state.db).await?;

    Ok(Envelope::ok("Tip updated", updated))
}

async fn delete_tip(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tip_id): Path<i64>,
) -> Result<Envelope<()>> {
    ensure_admin(&principal)?;

    let found = find_tip(&state, tip_id).await?;
    found.delete(&state.db).await?;

    tracing::info!(tip_id, "Tip deleted");
    Ok(Envelope::message("Tip deleted"))
}

/// PATCH /api/tips/{tip_id}/state — activate one tip, deactivating the rest
/// in the same transaction so a reader never sees zero or two active tips.
async fn update_tip_state(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(tip_id): Path<i64>,
    Json(payload): Json<TipStateRequest>,
) -> Result<Envelope<tip::Model>> {
    ensure_admin(&principal)?;

    let found = find_tip(&state, tip_id).await?;

    if !payload.active {
        let mut model: tip::ActiveModel = found.into();
        model.active = Set(false);
        let updated = model.update(&state.db).await?;
        return Ok(Envelope::ok("Tip deactivated", updated));
    }

    let updated = activate_tip(&state, found).await?;
    Ok(Envelope::ok("Tip activated", updated))
}

/// POST /api/tips/rotate — advance the active tip to the next id in cyclic
/// order. Entry point for the externally triggered rotation script.
async fn rotate_tip(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Envelope<tip::Model>> {
    ensure_admin(&principal)?;

    let current = Tip::find()
        .filter(tip::Column::Active.eq(true))
        .one(&state.db)
        .await?;

    let next = match &current {
        Some(active) => {
            let after = Tip::find()
                .filter(tip::Column::Id.gt(active.id))
                .order_by_asc(tip::Column::Id)
                .one(&state.db)
                .await?;
            match after {
                Some(t) => Some(t),
                // Wrap around to the lowest id
                None => Tip::find().order_by_asc(tip::Column::Id).one(&state.db).await?,
            }
        }
        None => Tip::find().order_by_asc(tip::Column::Id).one(&state.db).await?,
    };

    let next = next.ok_or_else(|| AppError::NotFound("No tips to rotate".to_string()))?;
    let updated = activate_tip(&state, next).await?;

    record_admin_notification(
        &state.db,
        "Tip rotation",
        &format!("Active tip rotated to tip {}", updated.id),
        "tip",
        "tip-rotation",
    )
    .await?;

    tracing::info!(tip_id = updated.id, "Tip rotated");
    Ok(Envelope::ok("Tip rotated", updated))
}

/// Deactivate all tips and activate the given one, atomically.
async fn activate_tip(state: &AppState, target: tip::Model) -> Result<tip::Model> {
    let txn = state.db.begin().await?;

    Tip::update_many()
        .col_expr(tip::Column::Active, sea_orm::sea_query::Expr::value(false))
        .filter(tip::Column::Active.eq(true))
        .exec(&txn)
        .await?;

    let mut model: tip::ActiveModel = target.into();
    model.active = Set(true);
    let updated = model.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

async fn find_tip(state: &AppState, tip_id: i64) -> Result<tip::Model> {
    Tip::find_by_id(tip_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tip not found".to_string()))
}
