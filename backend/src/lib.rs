//! Crop Advisor - Backend
//!
//! Recommends a crop from seven soil and climate measurements using pre-fitted
//! model artifacts, and relays cultivation advice from a hosted text-generation
//! endpoint, with per-session follow-up chat.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod artifacts;
pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use artifacts::ArtifactStatus;
use error::AppResult;
use external::AdviceClient;
use services::{SessionService, SessionStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub artifacts: ArtifactStatus,
    pub advice: AdviceClient,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, artifacts: ArtifactStatus) -> AppResult<Self> {
        let advice = AdviceClient::new(&config.advice)?;
        let sessions = SessionStore::new(config.sessions.max_sessions);

        Ok(Self {
            config: Arc::new(config),
            artifacts,
            advice,
            sessions,
        })
    }

    pub fn session_service(&self) -> SessionService {
        SessionService::new(self.sessions.clone(), self.advice.clone())
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Crop Advisor API v1.0"
}
