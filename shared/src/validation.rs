//! Validation utilities for form input
//!
//! Range checks come from the `validator` derive on [`FeatureVector`]; finiteness
//! is checked first because NaN slips through range comparisons.

use validator::Validate;

use crate::models::{FeatureVector, FEATURE_FIELDS};

/// Longest follow-up question accepted, in characters
pub const MAX_QUESTION_CHARS: usize = 2000;

/// A rejected measurement
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FeatureError {
    pub field: &'static str,
    pub message: String,
}

/// Validate every measurement is finite and inside its documented range.
/// Reports the first offending field in column order.
pub fn validate_features(features: &FeatureVector) -> Result<(), FeatureError> {
    for (field, value) in features.fields() {
        if !value.is_finite() {
            return Err(FeatureError {
                field: field.name,
                message: "must be a finite number".to_string(),
            });
        }
    }

    let errors = match features.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };
    let field_errors = errors.field_errors();

    for field in FEATURE_FIELDS.iter() {
        if field_errors.contains_key(field.name) {
            return Err(FeatureError {
                field: field.name,
                message: format!("must be between {} and {}", field.min, field.max),
            });
        }
    }

    Err(FeatureError {
        field: "features",
        message: errors.to_string(),
    })
}

/// Validate a follow-up question
pub fn validate_question(question: &str) -> Result<(), &'static str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err("Question cannot be empty");
    }
    if trimmed.chars().count() > MAX_QUESTION_CHARS {
        return Err("Question is too long");
    }
    Ok(())
}
