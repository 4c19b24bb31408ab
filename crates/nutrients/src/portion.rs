use serde::{Deserialize, Serialize};

/// A named household measure and its weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portion {
    /// Label such as "1 cup" or "1 medium"
    #[serde(rename = "name")]
    pub label: String,

    /// Weight in grams (one decimal)
    pub grams: f64,
}

impl Portion {
    #[must_use]
    pub fn new(label: impl Into<String>, grams: f64) -> Self {
        Self {
            label: label.into(),
            grams,
        }
    }
}
