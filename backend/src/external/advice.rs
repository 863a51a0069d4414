//! Cultivation Advice Client
//!
//! Client for a hosted text-generation endpoint. Request body is
//! `{"inputs": <prompt>}` with a bearer token; a successful response is a JSON
//! array whose first element carries `generated_text`.
//!
//! Advice is best effort: every failure is turned into display text, so
//! callers always get something to show.

use anyhow::Context;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AdviceConfig;
use crate::error::{AppError, AppResult};
use shared::{build_prompt, ConversationHistory, CropName, FeatureVector};

/// Shown when the endpoint answers with anything but 200
pub const FALLBACK_ADVICE: &str = "Unable to fetch agricultural insights.";

/// Client for the text-generation endpoint
#[derive(Clone)]
pub struct AdviceClient {
    endpoint: String,
    api_token: String,
    include_history_context: bool,
    http_client: Client,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// What happened to one advice request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceOutcome {
    Generated(String),
    Upstream(StatusCode),
    Transport(String),
}

impl AdviceOutcome {
    /// Collapse to non-empty display text
    pub fn into_text(self) -> String {
        match self {
            AdviceOutcome::Generated(text) if !text.trim().is_empty() => text,
            AdviceOutcome::Generated(_) | AdviceOutcome::Upstream(_) => FALLBACK_ADVICE.to_string(),
            AdviceOutcome::Transport(reason) => format!("Error fetching insights: {}", reason),
        }
    }
}

impl AdviceClient {
    /// Create a new advice client with a bounded request timeout
    pub fn new(config: &AdviceConfig) -> AppResult<Self> {
        Url::parse(&config.endpoint).map_err(|e| {
            AppError::Configuration(format!("advice.endpoint {:?} is not a URL: {}", config.endpoint, e))
        })?;
        if config.timeout_secs == 0 {
            return Err(AppError::Configuration(
                "advice.timeout_secs must be at least 1".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        if config.api_token.is_empty() {
            tracing::warn!("No advice API token configured; requests will be sent unauthenticated");
        }

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
            include_history_context: config.include_history_context,
            http_client,
        })
    }

    pub fn includes_history_context(&self) -> bool {
        self.include_history_context
    }

    /// Send a prompt and classify the result
    pub async fn request(&self, prompt: &str) -> AdviceOutcome {
        let mut request = self
            .http_client
            .post(&self.endpoint)
            .json(&GenerationRequest { inputs: prompt });
        if !self.api_token.is_empty() {
            request = request.bearer_auth(&self.api_token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Advice request failed: {}", e);
                return AdviceOutcome::Transport(e.to_string());
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("Advice endpoint returned {}", status);
            return AdviceOutcome::Upstream(status);
        }

        match response.json::<Vec<GeneratedText>>().await {
            Ok(mut items) if !items.is_empty() => {
                tracing::debug!("Advice generated");
                AdviceOutcome::Generated(items.swap_remove(0).generated_text)
            }
            Ok(_) => AdviceOutcome::Transport("empty response from advice endpoint".to_string()),
            Err(e) => {
                tracing::warn!("Failed to parse advice response: {}", e);
                AdviceOutcome::Transport(format!("Failed to parse response: {}", e))
            }
        }
    }

    /// Fetch cultivation advice. Never fails: errors come back as text.
    pub async fn get_advice(
        &self,
        crop: &CropName,
        features: &FeatureVector,
        follow_up: Option<&str>,
        history: Option<&ConversationHistory>,
    ) -> String {
        let prompt = build_prompt(
            crop,
            features,
            follow_up,
            history,
            self.include_history_context,
        );
        self.request(&prompt).await.into_text()
    }
}
