//! Backoffice administrator accounts.

use axum::{
    extract::{Extension, Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{ensure_admin, Principal};
use crate::models::admin;
use crate::models::prelude::*;
use crate::schemas::Envelope;
use crate::services::hash_password;
use crate::state::AppState;

pub fn admins_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route(
            "/{admin_id}",
            get(get_admin).patch(update_admin).delete(delete_admin),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAdminRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

async fn list_admins(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Envelope<Vec<admin::Model>>> {
    ensure_admin(&principal)?;

    let admins = Admin::find()
        .order_by_asc(admin::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Envelope::ok("Admins retrieved", admins))
}

async fn get_admin(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(admin_id): Path<i64>,
) -> Result<Envelope<admin::Model>> {
    ensure_admin(&principal)?;

    let found = find_admin(&state, admin_id).await?;
    Ok(Envelope::ok("Admin retrieved", found))
}

async fn create_admin(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<Envelope<admin::Model>> {
    ensure_admin(&principal)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let email = payload.email.trim().to_lowercase();
    let existing = Admin::find()
        .filter(admin::Column::Email.eq(email.as_str()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let new_admin = admin::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        email: Set(email),
        hashed_password: Set(hash_password(&payload.password)?),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = new_admin.insert(&state.db).await?;

    tracing::info!(admin_id = created.id, "Admin created");
    Ok(Envelope::created("Admin created", created))
}

async fn update_admin(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(admin_id): Path<i64>,
    Json(payload): Json<UpdateAdminRequest>,
) -> Result<Envelope<admin::Model>> {
    ensure_admin(&principal)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let found = find_admin(&state, admin_id).await?;

    if let Some(ref email) = payload.email {
        let email = email.trim().to_lowercase();
        if email != found.email {
            let taken = Admin::find()
                .filter(admin::Column::Email.eq(email.as_str()))
                .one(&state.db)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
        }
    }

    let mut model: admin::ActiveModel = found.into();
    if let Some(name) = payload.name {
        model.name = Set(name.trim().to_string());
    }
    if let Some(email) = payload.email {
        model.email = Set(email.trim().to_lowercase());
    }
    if let Some(password) = payload.password {
        model.hashed_password = Set(hash_password(&password)?);
    }

    let updated = model.update(&state.db).await?;
    Ok(Envelope::ok("Admin updated", updated))
}

async fn delete_admin(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(admin_id): Path<i64>,
) -> Result<Envelope<()>> {
    ensure_admin(&principal)?;

    let found = find_admin(&state, admin_id).await?;
    found.delete(&state.db).await?;

    tracing::info!(admin_id, "Admin deleted");
    Ok(Envelope::message("Admin deleted"))
}

async fn find_admin(state: &AppState, admin_id: i64) -> Result<admin::Model> {
    Admin::find_by_id(admin_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))
}
