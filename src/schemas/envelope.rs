//! Uniform response envelope.
//!
//! Every JSON response, success or error, has the shape
//! `{success, message, data, timestamp, statusCode}` with `statusCode`
//! mirroring the HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(message: &str, data: Option<T>, status: StatusCode) -> Self {
        Self {
            success: status.is_success(),
            message: message.to_string(),
            data,
            timestamp: Utc::now(),
            status_code: status.as_u16(),
        }
    }

    /// 200 OK with payload
    pub fn ok(message: &str, data: T) -> Self {
        Self::new(message, Some(data), StatusCode::OK)
    }

    /// 201 Created with payload
    pub fn created(message: &str, data: T) -> Self {
        Self::new(message, Some(data), StatusCode::CREATED)
    }

    /// Success with no payload
    pub fn message(message: &str) -> Self {
        Self::new(message, None, StatusCode::OK)
    }

    /// Failure envelope; used by the error type
    pub fn error(message: &str, status: StatusCode) -> Self {
        Self::new(message, None, status)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
