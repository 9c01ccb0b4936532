pub mod admins;
pub mod auth;
pub mod bets;
pub mod challenges;
pub mod championships;
pub mod games;
pub mod notifications;
pub mod questionnaires;
pub mod steps;
pub mod tips;
pub mod users;

use axum::{middleware as axum_middleware, Router};

use crate::middleware::{require_api_key, require_auth};
use crate::state::AppState;

/// Create the main API router.
///
/// Every `/api` route sits behind the API-key gate; the bearer-token gate
/// skips the public routes (login, signup, health) by path.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/auth", auth::auth_routes(state.clone()))
        .nest("/users", users::users_routes(state.clone()))
        .nest("/admins", admins::admins_routes(state.clone()))
        .nest("/challenges", challenges::challenges_routes(state.clone()))
        .nest("/steps", steps::steps_routes(state.clone()))
        .nest("/bets", bets::bets_routes(state.clone()))
        .nest("/games", games::games_routes(state.clone()))
        .nest(
            "/championships",
            championships::championships_routes(state.clone()),
        )
        .nest("/tips", tips::tips_routes(state.clone()))
        .nest(
            "/notifications",
            notifications::notifications_routes(state.clone()),
        )
        .nest("/questionnaires", questionnaires::questionnaires_routes(state));

    // Layer after nesting so the gates see full /api-prefixed paths
    Router::new()
        .nest("/api", api)
        .layer(axum_middleware::from_fn(require_auth))
        .layer(axum_middleware::from_fn(require_api_key))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
