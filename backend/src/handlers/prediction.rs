//! HTTP handlers for stateless prediction and advice

use axum::{extract::State, Json};

use crate::error::{AppError, AppResult};
use crate::services::RecommendationService;
use crate::AppState;
use shared::{
    validate_features, validate_question, AdviceRequest, AdviceResponse, FeatureVector,
    Recommendation,
};

/// Predict a crop from measurements
/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    Json(features): Json<FeatureVector>,
) -> AppResult<Json<Recommendation>> {
    validate_features(&features)?;
    let service = RecommendationService::from_status(&state.artifacts)?;
    Ok(Json(service.predict(&features)))
}

/// Relay cultivation advice for a crop
/// POST /advice
pub async fn advice(
    State(state): State<AppState>,
    Json(input): Json<AdviceRequest>,
) -> AppResult<Json<AdviceResponse>> {
    validate_features(&input.features)?;
    if let Some(question) = &input.follow_up {
        validate_question(question).map_err(|message| AppError::Validation {
            field: "follow_up".to_string(),
            message: message.to_string(),
        })?;
    }

    let text = state
        .advice
        .get_advice(
            &input.crop,
            &input.features,
            input.follow_up.as_deref(),
            input.history.as_ref(),
        )
        .await;
    Ok(Json(AdviceResponse { text }))
}
