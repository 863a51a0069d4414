//! Errors raised while loading artifacts or running the feature pipeline

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the three artifact slots an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    Scaler,
    Normalizer,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Classifier => write!(f, "classifier"),
            ArtifactKind::Scaler => write!(f, "scaler"),
            ArtifactKind::Normalizer => write!(f, "normalizer"),
        }
    }
}

/// Failure to load one of the model artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{artifact} artifact not found at {}", path.display())]
    Missing { artifact: ArtifactKind, path: PathBuf },

    #[error("failed to read {artifact} artifact: {source}")]
    Io {
        artifact: ArtifactKind,
        source: std::io::Error,
    },

    #[error("{artifact} artifact is not a valid document: {source}")]
    Malformed {
        artifact: ArtifactKind,
        source: serde_json::Error,
    },

    #[error("{artifact} artifact has unsupported format tag {found:?}")]
    UnsupportedFormat { artifact: ArtifactKind, found: String },

    #[error("{artifact} artifact version {found} is not supported")]
    UnsupportedVersion { artifact: ArtifactKind, found: u64 },

    #[error("{artifact} artifact failed schema check: {reason}")]
    Schema { artifact: ArtifactKind, reason: String },
}

impl ArtifactError {
    pub fn artifact(&self) -> ArtifactKind {
        match self {
            ArtifactError::Missing { artifact, .. }
            | ArtifactError::Io { artifact, .. }
            | ArtifactError::Malformed { artifact, .. }
            | ArtifactError::UnsupportedFormat { artifact, .. }
            | ArtifactError::UnsupportedVersion { artifact, .. }
            | ArtifactError::Schema { artifact, .. } => *artifact,
        }
    }
}

/// Failure while transforming or classifying a batch
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("{stage} expected {expected} features, got {found}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{stage} produced a non-finite value")]
    NonFinite { stage: &'static str },

    #[error("classifier returned no prediction")]
    EmptyPrediction,
}
