//! Admin notification log.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{delete, get, patch},
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::{ensure_admin, Principal};
use crate::models::admin_notification;
use crate::models::prelude::*;
use crate::schemas::Envelope;
use crate::services::record_admin_notification;
use crate::state::AppState;

pub fn notifications_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_notifications).post(create_notification))
        .route("/{notification_id}", delete(delete_notification))
        .route("/{notification_id}/read", patch(mark_read))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub is_read: Option<bool>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    pub kind: String,
    pub source: String,
}

async fn list_notifications(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<admin_notification::Model>>> {
    ensure_admin(&principal)?;

    let mut query =
        AdminNotification::find().order_by_desc(admin_notification::Column::CreatedAt);
    if let Some(is_read) = params.is_read {
        query = query.filter(admin_notification::Column::IsRead.eq(is_read));
    }

    let notifications = query
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(50))
        .all(&state.db)
        .await?;

    Ok(Envelope::ok("Notifications retrieved", notifications))
}

async fn create_notification(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<Envelope<admin_notification::Model>> {
    ensure_admin(&principal)?;

    if payload.title.trim().is_empty() || payload.message.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Title and message are required".to_string(),
        ));
    }

    let created = record_admin_notification(
        &state.db,
        payload.title.trim(),
        payload.message.trim(),
        payload.kind.trim(),
        payload.source.trim(),
    )
    .await?;

    Ok(Envelope::created("Notification created", created))
}

async fn mark_read(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(notification_id): Path<i64>,
) -> Result<Envelope<admin_notification::Model>> {
    ensure_admin(&principal)?;

    let found = find_notification(&state, notification_id).await?;
    let mut model: admin_notification::ActiveModel = found.into();
    model.is_read = Set(true);
    let updated = model.update(&state.db).await?;

    Ok(Envelope::ok("Notification marked as read", updated))
}

async fn delete_notification(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(notification_id): Path<i64>,
) -> Result<Envelope<()>> {
    ensure_admin(&principal)?;

    let found = find_notification(&state, notification_id).await?;
    found.delete(&state.db).await?;

    Ok(Envelope::message("Notification deleted"))
}

async fn find_notification(
    state: &AppState,
    notification_id: i64,
) -> Result<admin_notification::Model> {
    AdminNotification::find_by_id(notification_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))
}
