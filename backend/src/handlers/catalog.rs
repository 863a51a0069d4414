//! Static reference data for the form UI

use axum::Json;

use shared::{crop_entries, CropEntry, FeatureField, FEATURE_FIELDS};

/// Input descriptors for the seven measurements
pub async fn list_fields() -> Json<Vec<FeatureField>> {
    Json(FEATURE_FIELDS.to_vec())
}

/// The label → crop table
pub async fn list_crops() -> Json<Vec<CropEntry>> {
    Json(crop_entries())
}
