use crate::schema::NutrientKey;
use thiserror::Error;

/// Result type for nutrient operations
pub type Result<T> = std::result::Result<T, NutrientError>;

/// Errors raised while building or scaling nutrient vectors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NutrientError {
    /// Value is NaN, infinite or negative
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: NutrientKey, value: f64 },

    /// Serving amount is non-finite or negative
    #[error("Invalid amount: {0} g (must be finite and >= 0)")]
    InvalidAmount(f64),

    /// Key outside the canonical schema
    #[error("Unknown nutrient key: {0}")]
    UnknownKey(String),
}

impl NutrientError {
    /// Create an unknown key error
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownKey(key.into())
    }
}
