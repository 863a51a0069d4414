//! On-disk artifact documents
//!
//! Every artifact is a JSON object carrying a format tag, a version and a
//! `kind` discriminator:
//!
//! ```json
//! { "format": "crop-advisor-artifact", "version": 1, "kind": "min_max_scaler",
//!   "scale": [...], "min": [...] }
//! ```
//!
//! The header is checked before the body is decoded so that a document from a
//! newer exporter is reported as a version problem rather than a parse error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use super::error::{ArtifactError, ArtifactKind};

pub const ARTIFACT_FORMAT: &str = "crop-advisor-artifact";
pub const ARTIFACT_VERSION: u64 = 1;

/// A complete artifact document, used when exporting
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactDocument {
    pub format: &'static str,
    pub version: u64,
    #[serde(flatten)]
    pub body: ArtifactBody,
}

impl ArtifactDocument {
    pub fn new(body: ArtifactBody) -> Self {
        Self {
            format: ARTIFACT_FORMAT,
            version: ARTIFACT_VERSION,
            body,
        }
    }
}

/// Artifact payload, discriminated by `kind`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactBody {
    /// `x * scale + min`, the fitted attributes of a min-max scaler
    MinMaxScaler { scale: Vec<f64>, min: Vec<f64> },
    /// `(x - mean) / scale`
    StandardScaler { mean: Vec<f64>, scale: Vec<f64> },
    /// One weight row and intercept per class; highest decision value wins
    LinearClassifier {
        classes: Vec<i64>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    /// Majority vote over decision trees
    ForestClassifier {
        classes: Vec<i64>,
        trees: Vec<TreeSpec>,
    },
}

impl ArtifactBody {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ArtifactBody::MinMaxScaler { .. } => "min_max_scaler",
            ArtifactBody::StandardScaler { .. } => "standard_scaler",
            ArtifactBody::LinearClassifier { .. } => "linear_classifier",
            ArtifactBody::ForestClassifier { .. } => "forest_classifier",
        }
    }
}

/// Flattened tree; node 0 is the root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeSpec {
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum NodeSpec {
    /// Go to `left` when `x[feature] <= threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { class_index: usize },
}

/// Decode a document, checking its header first
pub fn parse_document(artifact: ArtifactKind, text: &str) -> Result<ArtifactBody, ArtifactError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|source| ArtifactError::Malformed { artifact, source })?;

    let format = value.get("format").and_then(Value::as_str).unwrap_or_default();
    if format != ARTIFACT_FORMAT {
        return Err(ArtifactError::UnsupportedFormat {
            artifact,
            found: format.to_string(),
        });
    }

    let version = value.get("version").and_then(Value::as_u64).unwrap_or(0);
    if version != ARTIFACT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            artifact,
            found: version,
        });
    }

    serde_json::from_value(value).map_err(|source| ArtifactError::Malformed { artifact, source })
}

/// Read and decode a document from disk
pub fn read_document(artifact: ArtifactKind, path: &Path) -> Result<ArtifactBody, ArtifactError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing {
                artifact,
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io { artifact, source }
        }
    })?;

    parse_document(artifact, &text)
}
