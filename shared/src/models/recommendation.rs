//! Outcome of running the feature pipeline and classifier

use serde::{Deserialize, Serialize};

use super::crop::{CropLabel, CropName};

/// Result of a prediction.
///
/// A label outside the crop table is a valid negative result (`NoMatch`), kept
/// separate from a pipeline failure so callers can tell the two apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Recommendation {
    Recommended { crop: CropName, label: CropLabel },
    NoMatch { label: CropLabel },
    Failed { reason: String },
}

impl Recommendation {
    /// Map a raw classifier label through the crop table
    pub fn from_label(label: CropLabel) -> Self {
        match CropName::from_label(label) {
            Some(crop) => Recommendation::Recommended { crop, label },
            None => Recommendation::NoMatch { label },
        }
    }

    /// Crop name when recommended, `None` for both a miss and a failure
    pub fn crop(&self) -> Option<&CropName> {
        match self {
            Recommendation::Recommended { crop, .. } => Some(crop),
            _ => None,
        }
    }

    pub fn is_recommended(&self) -> bool {
        matches!(self, Recommendation::Recommended { .. })
    }
}
