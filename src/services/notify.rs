use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};

use crate::error::Result;
use crate::models::admin_notification;
use crate::state::DbConn;

/// Append an admin-notification log entry. Used by the script entry points
/// (tip rotation, balance top-up) and admin-facing actions.
pub async fn record_admin_notification(
    db: &DbConn,
    title: &str,
    message: &str,
    kind: &str,
    source: &str,
) -> Result<admin_notification::Model> {
    let entry = admin_notification::ActiveModel {
        title: Set(title.to_string()),
        message: Set(message.to_string()),
        kind: Set(kind.to_string()),
        source: Set(source.to_string()),
        is_read: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    Ok(entry.insert(db).await?)
}
