//! Fitted feature transforms

use ndarray::{Array1, Array2};

use super::error::PipelineError;
use shared::FEATURE_COUNT;

/// Min-max normalization: `x * scale + min`
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    scale: Array1<f64>,
    min: Array1<f64>,
}

/// Standardization: `(x - mean) / scale`
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

fn check_params(name: &str, values: &[f64]) -> Result<(), String> {
    if values.len() != FEATURE_COUNT {
        return Err(format!(
            "{} has {} entries, expected {}",
            name,
            values.len(),
            FEATURE_COUNT
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(format!("{} contains a non-finite value", name));
    }
    Ok(())
}

fn check_batch(stage: &'static str, batch: &Array2<f64>) -> Result<(), PipelineError> {
    if batch.ncols() != FEATURE_COUNT {
        return Err(PipelineError::DimensionMismatch {
            stage,
            expected: FEATURE_COUNT,
            found: batch.ncols(),
        });
    }
    Ok(())
}

fn check_finite(stage: &'static str, out: Array2<f64>) -> Result<Array2<f64>, PipelineError> {
    if out.iter().all(|v| v.is_finite()) {
        Ok(out)
    } else {
        Err(PipelineError::NonFinite { stage })
    }
}

impl MinMaxScaler {
    pub fn new(scale: Vec<f64>, min: Vec<f64>) -> Result<Self, String> {
        check_params("scale", &scale)?;
        check_params("min", &min)?;
        Ok(Self {
            scale: Array1::from(scale),
            min: Array1::from(min),
        })
    }

    pub fn transform(&self, batch: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        check_batch("normalizer", batch)?;
        check_finite("normalizer", batch * &self.scale + &self.min)
    }
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, String> {
        check_params("mean", &mean)?;
        check_params("scale", &scale)?;
        if scale.iter().any(|s| *s == 0.0) {
            return Err("scale contains a zero entry".to_string());
        }
        Ok(Self {
            mean: Array1::from(mean),
            scale: Array1::from(scale),
        })
    }

    pub fn transform(&self, batch: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        check_batch("scaler", batch)?;
        check_finite("scaler", (batch - &self.mean) / &self.scale)
    }
}
