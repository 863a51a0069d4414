//! Crop labels produced by the classifier and the names they stand for

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Integer class emitted by the classifier
pub type CropLabel = i64;

/// Fixed label table the classifier was trained against
pub const CROP_TABLE: [(CropLabel, &str); 22] = [
    (1, "Rice"),
    (2, "Maize"),
    (3, "Jute"),
    (4, "Cotton"),
    (5, "Coconut"),
    (6, "Papaya"),
    (7, "Orange"),
    (8, "Apple"),
    (9, "Muskmelon"),
    (10, "Watermelon"),
    (11, "Grapes"),
    (12, "Mango"),
    (13, "Banana"),
    (14, "Pomegranate"),
    (15, "Lentil"),
    (16, "Blackgram"),
    (17, "Mungbean"),
    (18, "Mothbeans"),
    (19, "Pigeonpeas"),
    (20, "Kidneybeans"),
    (21, "Chickpea"),
    (22, "Coffee"),
];

/// Human-readable crop name; only values from [`CROP_TABLE`] can be constructed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct CropName(&'static str);

impl CropName {
    /// Resolve a classifier label. Labels outside the table are not an error, just no crop.
    pub fn from_label(label: CropLabel) -> Option<Self> {
        CROP_TABLE
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, name)| CropName(name))
    }

    /// Case-insensitive lookup by name
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        CROP_TABLE
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(_, n)| CropName(n))
    }

    pub fn label(&self) -> CropLabel {
        CROP_TABLE
            .iter()
            .find(|(_, n)| *n == self.0)
            .map(|(l, _)| *l)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CropName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Raised when a crop name does not appear in the label table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown crop: {0}")]
pub struct UnknownCrop(pub String);

impl TryFrom<String> for CropName {
    type Error = UnknownCrop;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CropName::parse(&value).ok_or(UnknownCrop(value))
    }
}

// Borrowed input cannot back the `&'static str`, so read an owned name and
// resolve it against the table.
impl<'de> Deserialize<'de> for CropName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        CropName::try_from(name).map_err(serde::de::Error::custom)
    }
}

impl From<CropName> for String {
    fn from(name: CropName) -> Self {
        name.0.to_string()
    }
}

/// One row of the label table, as served to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CropEntry {
    pub label: CropLabel,
    pub name: String,
}

pub fn crop_entries() -> Vec<CropEntry> {
    CROP_TABLE
        .iter()
        .map(|(label, name)| CropEntry {
            label: *label,
            name: name.to_string(),
        })
        .collect()
}
