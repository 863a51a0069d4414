//! Route definitions for the crop recommendation service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Form reference data
        .route("/fields", get(handlers::list_fields))
        .route("/crops", get(handlers::list_crops))
        // Stateless prediction and advice
        .route("/predict", post(handlers::predict))
        .route("/advice", post(handlers::advice))
        // Sessions
        .nest("/sessions", session_routes())
}

/// Recommendation session routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_session))
        .route(
            "/:session_id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/:session_id/recommendation", post(handlers::recommend))
        .route("/:session_id/messages", post(handlers::ask))
}
