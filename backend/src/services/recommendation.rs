//! Recommendation service: runs measurements through the loaded artifacts

use std::sync::Arc;

use crate::artifacts::{ArtifactStatus, Artifacts};
use crate::error::AppResult;
use shared::{FeatureVector, Recommendation};

/// Crop prediction over a shared set of artifacts
#[derive(Clone)]
pub struct RecommendationService {
    artifacts: Arc<Artifacts>,
}

impl RecommendationService {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self { artifacts }
    }

    /// Fails with `PipelineUnavailable` when the artifacts did not load
    pub fn from_status(status: &ArtifactStatus) -> AppResult<Self> {
        Ok(Self::new(status.artifacts()?))
    }

    /// Predict a crop. Pipeline failures are reported in the result rather than
    /// raised, and a label outside the crop table is `NoMatch`.
    pub fn predict(&self, features: &FeatureVector) -> Recommendation {
        match self.artifacts.classify(features) {
            Ok(label) => {
                let recommendation = Recommendation::from_label(label);
                match &recommendation {
                    Recommendation::Recommended { crop, .. } => {
                        tracing::info!("Predicted {} (label {})", crop, label)
                    }
                    _ => tracing::info!("Label {} is not in the crop table", label),
                }
                recommendation
            }
            Err(e) => {
                tracing::warn!("Error making prediction: {}", e);
                Recommendation::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
