//! Shared fixtures for integration tests
//!
//! - artifact documents written to a temporary directory
//! - an in-process text-generation stub bound on 127.0.0.1:0

#![allow(dead_code)]

use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crop_advisor::artifacts::{ArtifactBody, ArtifactDocument, NodeSpec, TreeSpec};
use crop_advisor::config::{AdviceConfig, ArtifactsConfig, Config, ServerConfig, SessionsConfig};
use shared::{FeatureVector, FEATURE_FIELDS};

/// The measurements from a typical rice paddy
pub fn rice_features() -> FeatureVector {
    FeatureVector::new(90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9)
}

/// Normalizer mapping each documented field range onto [0, 1]
pub fn range_normalizer() -> ArtifactBody {
    let scale: Vec<f64> = FEATURE_FIELDS.iter().map(|f| 1.0 / (f.max - f.min)).collect();
    let min: Vec<f64> = FEATURE_FIELDS
        .iter()
        .zip(&scale)
        .map(|(f, s)| -f.min * s)
        .collect();
    ArtifactBody::MinMaxScaler { scale, min }
}

/// Standardizer centring [0, 1] values on 0.5
pub fn centring_scaler() -> ArtifactBody {
    ArtifactBody::StandardScaler {
        mean: vec![0.5; 7],
        scale: vec![0.25; 7],
    }
}

/// Rice (label 1) above median rainfall, Maize (label 2) below
pub fn rainfall_forest() -> ArtifactBody {
    ArtifactBody::ForestClassifier {
        classes: vec![1, 2],
        trees: vec![TreeSpec {
            nodes: vec![
                NodeSpec::Split {
                    feature: 6,
                    threshold: 0.0,
                    left: 1,
                    right: 2,
                },
                NodeSpec::Leaf { class_index: 1 },
                NodeSpec::Leaf { class_index: 0 },
            ],
        }],
    }
}

/// Classifier that always answers `label`
pub fn constant_classifier(label: i64) -> ArtifactBody {
    ArtifactBody::ForestClassifier {
        classes: vec![label],
        trees: vec![TreeSpec {
            nodes: vec![NodeSpec::Leaf { class_index: 0 }],
        }],
    }
}

pub fn write_document(path: &Path, body: ArtifactBody) {
    let text = serde_json::to_string_pretty(&ArtifactDocument::new(body)).unwrap();
    std::fs::write(path, text).unwrap();
}

/// Write all three artifacts; the directory lives as long as the returned guard
pub fn write_artifacts(classifier: ArtifactBody) -> (TempDir, ArtifactsConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = ArtifactsConfig {
        dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    write_document(&config.normalizer_path(), range_normalizer());
    write_document(&config.scaler_path(), centring_scaler());
    write_document(&config.classifier_path(), classifier);
    (dir, config)
}

#[derive(Clone)]
struct StubState {
    status: Arc<AtomicU16>,
    body: Arc<Mutex<String>>,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

/// Fake text-generation endpoint
pub struct StubUpstream {
    pub url: String,
    state: StubState,
}

async fn generate(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push((auth, body));

    let status = StatusCode::from_u16(state.status.load(Ordering::SeqCst)).unwrap();
    (status, state.body.lock().unwrap().clone())
}

impl StubUpstream {
    /// Answers 200 with a single generated text until told otherwise
    pub async fn start(text: &str) -> Self {
        let state = StubState {
            status: Arc::new(AtomicU16::new(200)),
            body: Arc::new(Mutex::new(
                json!([{ "generated_text": text }]).to_string(),
            )),
            hits: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/generate", post(generate))
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/generate", addr),
            state,
        }
    }

    pub fn respond_with(&self, status: u16, body: &str) {
        self.state.status.store(status, Ordering::SeqCst);
        *self.state.body.lock().unwrap() = body.to_string();
    }

    pub fn set_status(&self, status: u16) {
        self.state.status.store(status, Ordering::SeqCst);
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Prompt sent with the most recent request
    pub fn last_prompt(&self) -> Option<String> {
        self.state
            .requests
            .lock()
            .unwrap()
            .last()
            .and_then(|(_, body)| body["inputs"].as_str().map(str::to_string))
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state
            .requests
            .lock()
            .unwrap()
            .last()
            .and_then(|(auth, _)| auth.clone())
    }

    pub fn advice_config(&self) -> AdviceConfig {
        AdviceConfig {
            endpoint: self.url.clone(),
            api_token: "test-token".to_string(),
            timeout_secs: 5,
            include_history_context: false,
        }
    }
}

/// Full config pointing at the given artifacts and advice endpoint
pub fn test_config(artifacts: ArtifactsConfig, advice: AdviceConfig) -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        artifacts,
        advice,
        sessions: SessionsConfig::default(),
    }
}
