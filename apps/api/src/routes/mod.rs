pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::generation::handlers as generation;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless procedures
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/generate", post(generation::handle_generate))
        // Session-scoped flow
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/analyze",
            post(session::handle_session_analyze),
        )
        .route(
            "/api/v1/sessions/:id/generate",
            post(session::handle_session_generate),
        )
        .route(
            "/api/v1/sessions/:id/reset",
            post(session::handle_reset_session),
        )
        .with_state(state)
}
