//! Pre-fitted model artifacts and the prediction pipeline they form
//!
//! The three artifacts are loaded once at startup into an [`Artifacts`] value
//! that is shared read-only by every request. Load failure does not stop the
//! server; it leaves the status `Unavailable` and prediction requests are
//! refused with the load reason.

mod classifier;
mod error;
mod format;
mod transform;

use ndarray::Array2;
use std::sync::Arc;

use crate::config::ArtifactsConfig;
use crate::error::{AppError, AppResult};
use shared::{CropLabel, FeatureVector, FEATURE_COUNT};

pub use classifier::{Classifier, ForestClassifier, LinearClassifier};
pub use error::{ArtifactError, ArtifactKind, PipelineError};
pub use format::{
    parse_document, read_document, ArtifactBody, ArtifactDocument, NodeSpec, TreeSpec,
    ARTIFACT_FORMAT, ARTIFACT_VERSION,
};
pub use transform::{MinMaxScaler, StandardScaler};

/// The classifier plus the two transforms applied before it
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub classifier: Classifier,
    pub scaler: StandardScaler,
    pub normalizer: MinMaxScaler,
}

impl Artifacts {
    /// Read all three artifacts from the configured directory
    pub fn load(config: &ArtifactsConfig) -> Result<Self, ArtifactError> {
        let normalizer = read_document(ArtifactKind::Normalizer, &config.normalizer_path())?;
        let scaler = read_document(ArtifactKind::Scaler, &config.scaler_path())?;
        let classifier = read_document(ArtifactKind::Classifier, &config.classifier_path())?;

        Self::from_bodies(classifier, scaler, normalizer)
    }

    /// Build from decoded documents, checking each sits in the right slot
    pub fn from_bodies(
        classifier: ArtifactBody,
        scaler: ArtifactBody,
        normalizer: ArtifactBody,
    ) -> Result<Self, ArtifactError> {
        let normalizer = match normalizer {
            ArtifactBody::MinMaxScaler { scale, min } => MinMaxScaler::new(scale, min),
            other => Err(wrong_kind("min_max_scaler", &other)),
        }
        .map_err(|reason| schema(ArtifactKind::Normalizer, reason))?;

        let scaler = match scaler {
            ArtifactBody::StandardScaler { mean, scale } => StandardScaler::new(mean, scale),
            other => Err(wrong_kind("standard_scaler", &other)),
        }
        .map_err(|reason| schema(ArtifactKind::Scaler, reason))?;

        let classifier = match classifier {
            ArtifactBody::LinearClassifier {
                classes,
                coefficients,
                intercepts,
            } => LinearClassifier::new(classes, coefficients, intercepts).map(Classifier::Linear),
            ArtifactBody::ForestClassifier { classes, trees } => {
                ForestClassifier::new(classes, trees).map(Classifier::Forest)
            }
            other => Err(wrong_kind("a classifier", &other)),
        }
        .map_err(|reason| schema(ArtifactKind::Classifier, reason))?;

        Ok(Self {
            classifier,
            scaler,
            normalizer,
        })
    }

    /// Normalize, standardize, then classify. The stage order is fixed: each
    /// transform was fitted on the previous stage's output.
    pub fn classify(&self, features: &FeatureVector) -> Result<CropLabel, PipelineError> {
        let batch = Array2::from_shape_vec((1, FEATURE_COUNT), features.to_array().to_vec())
            .map_err(|_| PipelineError::DimensionMismatch {
                stage: "input",
                expected: FEATURE_COUNT,
                found: features.to_array().len(),
            })?;

        let normalized = self.normalizer.transform(&batch)?;
        let scaled = self.scaler.transform(&normalized)?;
        let labels = self.classifier.predict(&scaled)?;

        labels.first().copied().ok_or(PipelineError::EmptyPrediction)
    }
}

fn wrong_kind(expected: &str, found: &ArtifactBody) -> String {
    format!("expected {}, found {}", expected, found.kind_name())
}

fn schema(artifact: ArtifactKind, reason: String) -> ArtifactError {
    ArtifactError::Schema { artifact, reason }
}

/// Load state of the process-wide artifacts
#[derive(Debug, Clone)]
pub enum ArtifactStatus {
    Ready(Arc<Artifacts>),
    Unavailable(String),
}

impl ArtifactStatus {
    /// Load once; failures are logged and kept as the unavailable reason
    pub fn load(config: &ArtifactsConfig) -> Self {
        tracing::info!("Loading model artifacts from {}", config.dir.display());
        match Artifacts::load(config) {
            Ok(artifacts) => {
                tracing::info!(
                    "Model artifacts loaded ({} classes)",
                    artifacts.classifier.classes().len()
                );
                ArtifactStatus::Ready(Arc::new(artifacts))
            }
            Err(e) => {
                tracing::error!("Error loading model files: {}", e);
                ArtifactStatus::Unavailable(e.to_string())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ArtifactStatus::Ready(_))
    }

    /// Shared handle to the loaded artifacts
    pub fn artifacts(&self) -> AppResult<Arc<Artifacts>> {
        match self {
            ArtifactStatus::Ready(artifacts) => Ok(Arc::clone(artifacts)),
            ArtifactStatus::Unavailable(reason) => {
                Err(AppError::PipelineUnavailable(reason.clone()))
            }
        }
    }
}

impl From<Artifacts> for ArtifactStatus {
    fn from(artifacts: Artifacts) -> Self {
        ArtifactStatus::Ready(Arc::new(artifacts))
    }
}
