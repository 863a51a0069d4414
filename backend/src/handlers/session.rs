//! HTTP handlers for recommendation sessions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::RecommendationService;
use crate::AppState;
use shared::{AskRequest, FeatureVector, RecommendationResponse, SessionView};

/// Open a session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let view = state.sessions.create().await;
    (StatusCode::CREATED, Json(view))
}

/// Get a session with its chat history
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    Ok(Json(state.sessions.view(session_id).await?))
}

/// Close a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.delete(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submit measurements; a recommended crop restarts the conversation
/// POST /sessions/:session_id/recommendation
pub async fn recommend(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(features): Json<FeatureVector>,
) -> AppResult<Json<RecommendationResponse>> {
    let recommender = RecommendationService::from_status(&state.artifacts)?;
    let response = state
        .session_service()
        .recommend(session_id, features, &recommender)
        .await?;
    Ok(Json(response))
}

/// Ask a follow-up question about the current crop
/// POST /sessions/:session_id/messages
pub async fn ask(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<AskRequest>,
) -> AppResult<Json<SessionView>> {
    let view = state
        .session_service()
        .ask(session_id, &input.question)
        .await?;
    Ok(Json(view))
}
