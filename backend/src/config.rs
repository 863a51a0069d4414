//! Configuration management for the crop recommendation service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CROP_ prefix
//!
//! The advice endpoint token has no default and is never compiled in.

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Default hosted text-generation model
pub const DEFAULT_ADVICE_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-Nemo-Instruct-2407";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Model artifact locations
    pub artifacts: ArtifactsConfig,

    /// Text-generation endpoint configuration
    pub advice: AdviceConfig,

    /// In-memory session limits
    pub sessions: SessionsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactsConfig {
    /// Directory holding the three artifact files
    pub dir: PathBuf,

    pub classifier_file: String,

    /// Standardization applied after normalization
    pub scaler_file: String,

    /// Min-max normalization applied first
    pub normalizer_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdviceConfig {
    /// Text-generation endpoint URL
    pub endpoint: String,

    /// Bearer token for the endpoint
    #[serde(default)]
    pub api_token: String,

    /// Upper bound on a single advice request
    pub timeout_secs: u64,

    /// Send prior chat turns as context in the prompt
    pub include_history_context: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionsConfig {
    /// Sessions kept in memory before the least recently used is evicted
    pub max_sessions: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CROP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("artifacts.dir", "models")?
            .set_default("artifacts.classifier_file", "classifier.json")?
            .set_default("artifacts.scaler_file", "standard_scaler.json")?
            .set_default("artifacts.normalizer_file", "minmax_scaler.json")?
            .set_default("advice.endpoint", DEFAULT_ADVICE_ENDPOINT)?
            .set_default("advice.api_token", "")?
            .set_default("advice.timeout_secs", 60)?
            .set_default("advice.include_history_context", false)?
            .set_default("sessions.max_sessions", 1000)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables, e.g. CROP_ADVICE__API_TOKEN
            .add_source(
                Environment::with_prefix("CROP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            classifier_file: "classifier.json".to_string(),
            scaler_file: "standard_scaler.json".to_string(),
            normalizer_file: "minmax_scaler.json".to_string(),
        }
    }
}

impl ArtifactsConfig {
    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join(&self.classifier_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(&self.scaler_file)
    }

    pub fn normalizer_path(&self) -> PathBuf {
        self.dir.join(&self.normalizer_file)
    }
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ADVICE_ENDPOINT.to_string(),
            api_token: String::new(),
            timeout_secs: 60,
            include_history_context: false,
        }
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self { max_sessions: 1000 }
    }
}
