use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use serde::Deserialize;
use validator::Validate;

use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::middleware::{ensure_admin, ensure_self_or_admin, Principal};
use crate::models::prelude::*;
use crate::models::user;
use crate::schemas::Envelope;
use crate::services::{hash_password, record_admin_notification};
use crate::state::AppState;

/// Create users routes, including the user-scoped challenge and bet routes.
pub fn users_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_users).post(signup))
        .route(
            "/{user_id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/{user_id}/balance", post(adjust_balance))
        .route("/{user_id}/points", patch(adjust_points))
        .with_state(state.clone())
        .merge(crate::endpoints::challenges::user_challenge_routes(
            state.clone(),
        ))
        .merge(crate::endpoints::bets::user_bets_routes(state))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BalanceAdjustRequest {
    /// Positive credits, negative debits.
    pub amount: Decimal,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PointsAdjustRequest {
    pub delta: i32,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/users — public signup
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Envelope<user::Model>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let email = payload.email.trim().to_lowercase();
    let existing = User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let now = Utc::now();
    let new_user = user::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        email: Set(email),
        hashed_password: Set(hash_password(&payload.password)?),
        balance: Set(CONFIG.platform.initial_balance),
        points: Set(0),
        avatar_url: Set(payload.avatar_url),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_user.insert(&state.db).await?;

    tracing::info!(user_id = created.id, "User registered");
    Ok(Envelope::created("User created", created))
}

/// GET /api/users — admin only
async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<user::Model>>> {
    ensure_admin(&principal)?;

    let users = User::find()
        .order_by_asc(user::Column::Id)
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Envelope::ok("Users retrieved", users))
}

/// GET /api/users/{user_id}
async fn get_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> Result<Envelope<user::Model>> {
    ensure_self_or_admin(&principal, user_id)?;

    let found = find_user(&state, user_id).await?;
    Ok(Envelope::ok("User retrieved", found))
}

/// PATCH /api/users/{user_id}
async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Envelope<user::Model>> {
    ensure_self_or_admin(&principal, user_id)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let found = find_user(&state, user_id).await?;

    if let Some(ref email) = payload.email {
        let email = email.trim().to_lowercase();
        if email != found.email {
            let taken = User::find()
                .filter(user::Column::Email.eq(email.as_str()))
                .one(&state.db)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
        }
    }

    let mut model: user::ActiveModel = found.into();
    if let Some(name) = payload.name {
        model.name = Set(name.trim().to_string());
    }
    if let Some(email) = payload.email {
        model.email = Set(email.trim().to_lowercase());
    }
    if let Some(password) = payload.password {
        model.hashed_password = Set(hash_password(&password)?);
    }
    if let Some(avatar_url) = payload.avatar_url {
        model.avatar_url = Set(Some(avatar_url));
    }
    model.updated_at = Set(Utc::now());

    let updated = model.update(&state.db).await?;
    Ok(Envelope::ok("User updated", updated))
}

/// DELETE /api/users/{user_id}
async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> Result<Envelope<()>> {
    ensure_self_or_admin(&principal, user_id)?;

    let found = find_user(&state, user_id).await?;
    found.delete(&state.db).await?;

    tracing::info!(user_id, "User deleted");
    Ok(Envelope::message("User deleted"))
}

/// POST /api/users/{user_id}/balance — admin credit/debit
///
/// Entry point for the externally triggered top-up script.
async fn adjust_balance(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(payload): Json<BalanceAdjustRequest>,
) -> Result<Envelope<user::Model>> {
    ensure_admin(&principal)?;

    let found = find_user(&state, user_id).await?;
    let new_balance = found.balance + payload.amount;
    if new_balance < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Balance cannot become negative".to_string(),
        ));
    }

    let mut model: user::ActiveModel = found.into();
    model.balance = Set(new_balance);
    model.updated_at = Set(Utc::now());
    let updated = model.update(&state.db).await?;

    let reason = payload.reason.unwrap_or_else(|| "unspecified".to_string());
    record_admin_notification(
        &state.db,
        "Balance adjustment",
        &format!(
            "Balance of user {} adjusted by {} ({}), new balance {}",
            user_id, payload.amount, reason, updated.balance
        ),
        "balance",
        "balance-topup",
    )
    .await?;

    Ok(Envelope::ok("Balance updated", updated))
}

/// PATCH /api/users/{user_id}/points — admin reward adjustment
async fn adjust_points(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(payload): Json<PointsAdjustRequest>,
) -> Result<Envelope<user::Model>> {
    ensure_admin(&principal)?;

    let found = find_user(&state, user_id).await?;
    let new_points = found.points + payload.delta;
    if new_points < 0 {
        return Err(AppError::BadRequest(
            "Points cannot become negative".to_string(),
        ));
    }

    let mut model: user::ActiveModel = found.into();
    model.points = Set(new_points);
    model.updated_at = Set(Utc::now());
    let updated = model.update(&state.db).await?;

    Ok(Envelope::ok("Points updated", updated))
}

async fn find_user(state: &AppState, user_id: i64) -> Result<user::Model> {
    User::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
