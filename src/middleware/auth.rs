//! Authentication middleware for API routes
//!
//! Two independent gates: a static `x-api-key` header identifying a known
//! frontend on every `/api` route, and a Bearer JWT identifying the
//! individual principal on protected routes.

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CONFIG;
use crate::services::security::{decode_token, Role};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Authenticated principal stored in request extensions.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: i64,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Gate every API route behind the static key header.
///
/// Returns 401 when the header is missing or matches neither configured key.
/// The health probe stays keyless. Per-route authorization is carried by the
/// token role, not the key.
pub async fn require_api_key(req: Request, next: Next) -> Response {
    if req.uri().path() == "/api/health" {
        return next.run(req).await;
    }

    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(key) if key == CONFIG.auth.admin_api_key || key == CONFIG.auth.user_api_key => {}
        Some(_) => return unauthorized("Invalid API key"),
        None => return unauthorized("Missing API key"),
    }

    next.run(req).await
}

/// Validate the Bearer token and attach the [`Principal`] to the request.
///
/// Skips the public routes: login, signup and the health probe.
/// Returns 401 when the token is missing, malformed or expired.
pub async fn require_auth(mut req: Request, next: Next) -> Response {
    let path = req.uri().path();
    if path.starts_with("/api/auth/")
        || path == "/api/health"
        || (path == "/api/users" && req.method() == Method::POST)
    {
        return next.run(req).await;
    }

    let token = match extract_bearer_token(&req) {
        Some(t) => t,
        None => return unauthorized("Missing or invalid Authorization header"),
    };

    let claims = match decode_token(&token) {
        Ok(c) => c,
        Err(_) => return unauthorized("Invalid or expired token"),
    };
    let id = match claims.subject_id() {
        Ok(id) => id,
        Err(_) => return unauthorized("Invalid token subject"),
    };

    req.extensions_mut().insert(Principal {
        id,
        role: claims.role,
    });

    next.run(req).await
}

fn extract_bearer_token(req: &Request) -> Option<String> {
    let auth_header = req.headers().get(AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;
    Some(token.to_string())
}

fn unauthorized(message: &str) -> Response {
    crate::schemas::Envelope::<()>::error(message, StatusCode::UNAUTHORIZED).into_response()
}
