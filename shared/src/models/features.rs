//! Soil and climate measurements submitted for a recommendation

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of measurements the classifier expects, in column order
pub const FEATURE_COUNT: usize = 7;

/// The seven agronomic measurements, in the column order the artifacts were fitted on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct FeatureVector {
    /// Nitrogen content ratio in soil
    #[validate(range(min = 0.0, max = 140.0))]
    pub nitrogen: f64,
    /// Phosphorus content ratio in soil
    #[validate(range(min = 0.0, max = 145.0))]
    pub phosphorus: f64,
    /// Potassium content ratio in soil
    #[validate(range(min = 0.0, max = 205.0))]
    pub potassium: f64,
    /// Temperature in degrees Celsius
    #[validate(range(min = 0.0, max = 50.0))]
    pub temperature: f64,
    /// Relative humidity in percent
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: f64,
    /// Soil pH
    #[validate(range(min = 0.0, max = 14.0))]
    pub ph: f64,
    /// Rainfall in millimetres
    #[validate(range(min = 0.0, max = 300.0))]
    pub rainfall: f64,
}

impl FeatureVector {
    pub fn new(
        nitrogen: f64,
        phosphorus: f64,
        potassium: f64,
        temperature: f64,
        humidity: f64,
        ph: f64,
        rainfall: f64,
    ) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph,
            rainfall,
        }
    }

    /// Values in classifier column order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }

    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [nitrogen, phosphorus, potassium, temperature, humidity, ph, rainfall] = values;
        Self::new(
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph,
            rainfall,
        )
    }

    /// Pair each value with its field descriptor
    pub fn fields(&self) -> impl Iterator<Item = (&'static FeatureField, f64)> + '_ {
        FEATURE_FIELDS.iter().zip(self.to_array())
    }
}

/// Describes one form input: its key, label, unit and accepted range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureField {
    pub name: &'static str,
    pub label: &'static str,
    /// Display unit ("" when unitless)
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl FeatureField {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Field descriptors in classifier column order
pub static FEATURE_FIELDS: [FeatureField; FEATURE_COUNT] = [
    FeatureField {
        name: "nitrogen",
        label: "Nitrogen level (N)",
        unit: "",
        min: 0.0,
        max: 140.0,
        step: 1.0,
    },
    FeatureField {
        name: "phosphorus",
        label: "Phosphorus level (P)",
        unit: "",
        min: 0.0,
        max: 145.0,
        step: 1.0,
    },
    FeatureField {
        name: "potassium",
        label: "Potassium level (K)",
        unit: "",
        min: 0.0,
        max: 205.0,
        step: 1.0,
    },
    FeatureField {
        name: "temperature",
        label: "Temperature (°C)",
        unit: "°C",
        min: 0.0,
        max: 50.0,
        step: 0.1,
    },
    FeatureField {
        name: "humidity",
        label: "Humidity (%)",
        unit: "%",
        min: 0.0,
        max: 100.0,
        step: 0.1,
    },
    FeatureField {
        name: "ph",
        label: "pH value",
        unit: "",
        min: 0.0,
        max: 14.0,
        step: 0.1,
    },
    FeatureField {
        name: "rainfall",
        label: "Rainfall (mm)",
        unit: "mm",
        min: 0.0,
        max: 300.0,
        step: 0.1,
    },
];
