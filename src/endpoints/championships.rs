//! Stored championship documents and the generation entry point.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, post},
    Router,
};
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::{ensure_admin, Principal};
use crate::models::championship;
use crate::models::prelude::*;
use crate::schemas::Envelope;
use crate::state::AppState;

pub fn championships_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_championships))
        .route("/generate", post(generate_championship))
        .route("/{championship_id}", get(get_championship))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// Stored blob decoded back into JSON for the response.
#[derive(Debug, Serialize)]
pub struct ChampionshipResponse {
    pub id: i64,
    pub data: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<championship::Model> for ChampionshipResponse {
    type Error = AppError;

    fn try_from(model: championship::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            data: serde_json::from_str(&model.data)?,
            created_at: model.created_at,
        })
    }
}

async fn list_championships(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<ChampionshipResponse>>> {
    let rows = Championship::find()
        .order_by_desc(championship::Column::CreatedAt)
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(20))
        .all(&state.db)
        .await?;

    let championships = rows
        .into_iter()
        .map(ChampionshipResponse::try_from)
        .collect::<Result<Vec<_>>>()?;

    Ok(Envelope::ok("Championships retrieved", championships))
}

async fn get_championship(
    State(state): State<AppState>,
    Path(championship_id): Path<i64>,
) -> Result<Envelope<ChampionshipResponse>> {
    let found = Championship::find_by_id(championship_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Championship not found".to_string()))?;

    Ok(Envelope::ok("Championship retrieved", found.try_into()?))
}

/// POST /api/championships/generate — ask the AI provider for a new
/// championship document and persist it.
async fn generate_championship(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Envelope<ChampionshipResponse>> {
    ensure_admin(&principal)?;

    let created = state.generator.generate_and_store(&state.db).await?;
    tracing::info!(championship_id = created.id, "Championship generated");

    Ok(Envelope::created("Championship generated", created.try_into()?))
}
