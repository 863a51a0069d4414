//! Request and response bodies exchanged between the server and the form UI

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ConversationHistory, CropName, FeatureVector, Recommendation};

/// Stateless advice request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub crop: CropName,
    pub features: FeatureVector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<ConversationHistory>,
}

/// Advice text relayed from the text-generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdviceResponse {
    pub text: String,
}

/// A follow-up question within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Client-facing view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub crop: Option<CropName>,
    pub features: Option<FeatureVector>,
    pub history: ConversationHistory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of submitting the form within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendation: Recommendation,
    /// Initial cultivation insights, present only when a crop was recommended
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
    pub session: SessionView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advice_request_from_runtime_json() {
        let body = format!(
            r#"{{"crop":"{}","features":{{"nitrogen":90,"phosphorus":42,"potassium":43,
                "temperature":20.8,"humidity":82,"ph":6.5,"rainfall":202.9}},
                "follow_up":"When to sow?"}}"#,
            "mango"
        );
        let request: AdviceRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(request.crop.as_str(), "Mango");
        assert_eq!(request.follow_up.as_deref(), Some("When to sow?"));
        assert!(request.history.is_none());
    }

    #[test]
    fn test_advice_request_rejects_unknown_crop() {
        let body = String::from(
            r#"{"crop":"Tobacco","features":{"nitrogen":0,"phosphorus":0,"potassium":0,
                "temperature":0,"humidity":0,"ph":0,"rainfall":0}}"#,
        );
        let err = serde_json::from_str::<AdviceRequest>(&body).unwrap_err();
        assert!(err.to_string().contains("unknown crop: Tobacco"));
    }

    #[test]
    fn test_recommendation_response_reads_back() {
        let body = String::from(
            r#"{"recommendation":{"outcome":"recommended","crop":"Rice","label":1},
                "insights":"Keep the paddy flooded.",
                "session":{"id":"6f1c2a1e-8b7d-4c39-9a55-0d2f4e7b1c10","crop":"rice",
                  "features":null,"history":[{"role":"user","content":"hi"}],
                  "created_at":"2026-10-17T08:00:00Z","updated_at":"2026-10-17T08:05:00Z"}}"#,
        );
        let response: RecommendationResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(response.recommendation, Recommendation::from_label(1));
        assert_eq!(response.session.crop.map(|c| c.as_str()), Some("Rice"));
        assert_eq!(response.session.history.len(), 1);
    }
}
