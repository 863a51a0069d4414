//! Health check handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::artifacts::ArtifactStatus;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub artifacts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts_error: Option<String>,
    pub open_sessions: usize,
}

/// Health check endpoint handler. The server stays healthy when the artifacts
/// failed to load; the failure is reported instead.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (artifacts, artifacts_error) = match &state.artifacts {
        ArtifactStatus::Ready(_) => ("loaded".to_string(), None),
        ArtifactStatus::Unavailable(reason) => ("unavailable".to_string(), Some(reason.clone())),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        artifacts,
        artifacts_error,
        open_sessions: state.sessions.len().await,
    })
}
