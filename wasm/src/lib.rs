//! WebAssembly module for the Crop Advisor form
//!
//! Provides client-side helpers for:
//! - Field descriptors and ranges
//! - Measurement validation before submit
//! - Crop table lookups
//! - Advice prompt preview

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::prompt::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("crop advisor form helpers loaded"));
}

/// Field descriptors (name, label, unit, range, step) as JSON
#[wasm_bindgen]
pub fn field_ranges_json() -> String {
    serde_json::to_string(&FEATURE_FIELDS[..]).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Serialize)]
struct FieldProblem<'a> {
    field: &'a str,
    message: String,
}

/// Validate form measurements given as JSON.
///
/// Returns `None` when the input is acceptable, otherwise a JSON object
/// `{"field": ..., "message": ...}` describing the first problem.
#[wasm_bindgen]
pub fn validate_features_json(features_json: &str) -> Option<String> {
    let problem = match serde_json::from_str::<FeatureVector>(features_json) {
        Ok(features) => validate_features(&features).err().map(|e| FieldProblem {
            field: e.field,
            message: e.message,
        }),
        Err(e) => Some(FieldProblem {
            field: "features",
            message: format!("Invalid measurements JSON: {}", e),
        }),
    }?;

    serde_json::to_string(&problem).ok()
}

/// Validate a follow-up question; returns the problem, if any
#[wasm_bindgen]
pub fn validate_question_text(question: &str) -> Option<String> {
    validate_question(question).err().map(str::to_string)
}

/// Crop name for a classifier label, or `None` outside the table
#[wasm_bindgen]
pub fn crop_name_for_label(label: i32) -> Option<String> {
    CropName::from_label(i64::from(label)).map(|crop| crop.to_string())
}

/// Table label for a crop name, matched case-insensitively
#[wasm_bindgen]
pub fn crop_label_for_name(name: &str) -> Option<i32> {
    CropName::parse(name).and_then(|crop| i32::try_from(crop.label()).ok())
}

/// Preview the advice prompt the server would send for this crop and form.
/// Prior turns are left out, matching the server default.
#[wasm_bindgen]
pub fn prompt_preview(
    crop: &str,
    features_json: &str,
    follow_up: Option<String>,
) -> Result<String, JsValue> {
    let crop = CropName::parse(crop)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown crop: {}", crop.trim())))?;
    let features: FeatureVector = serde_json::from_str(features_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid measurements JSON: {}", e)))?;

    Ok(build_prompt(&crop, &features, follow_up.as_deref(), None, false))
}

/// All crop names in label order
#[wasm_bindgen]
pub fn crop_names() -> js_sys::Array {
    CROP_TABLE
        .iter()
        .map(|(_, name)| JsValue::from_str(name))
        .collect()
}
