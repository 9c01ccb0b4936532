//! Login endpoints for the two principal classes.

use axum::{extract::State, routing::post, Json, Router};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{admin, user};
use crate::schemas::Envelope;
use crate::services::security::{create_access_token, verify_password, Role};
use crate::state::AppState;

pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/admin/login", post(admin_login))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: CONFIG.auth.token_expire_secs,
        }
    }
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Envelope<TokenResponse>> {
    // Emails are stored lowercased; canonicalize the input the same way
    let email = payload.email.trim().to_lowercase();
    let found = User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(&state.db)
        .await?;

    // Same error for unknown email and wrong password
    let found = found.ok_or_else(invalid_credentials)?;
    if !verify_password(&payload.password, &found.hashed_password) {
        return Err(invalid_credentials());
    }

    let token = create_access_token(found.id, Role::User)?;
    tracing::info!(user_id = found.id, "User logged in");

    Ok(Envelope::ok(
        "Login successful",
        TokenResponse::bearer(token),
    ))
}

/// POST /api/auth/admin/login
async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Envelope<TokenResponse>> {
    let email = payload.email.trim().to_lowercase();
    let found = Admin::find()
        .filter(admin::Column::Email.eq(email.as_str()))
        .one(&state.db)
        .await?;

    let found = found.ok_or_else(invalid_credentials)?;
    if !verify_password(&payload.password, &found.hashed_password) {
        return Err(invalid_credentials());
    }

    let token = create_access_token(found.id, Role::Admin)?;
    tracing::info!(admin_id = found.id, "Admin logged in");

    Ok(Envelope::ok(
        "Login successful",
        TokenResponse::bearer(token),
    ))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}
