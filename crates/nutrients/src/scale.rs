use crate::error::{NutrientError, Result};
use crate::rounding::round3;
use crate::vector::NutrientVector;
use serde::Serialize;

fn validate_grams(grams: f64) -> Result<()> {
    if grams.is_finite() && grams >= 0.0 {
        Ok(())
    } else {
        Err(NutrientError::InvalidAmount(grams))
    }
}

/// Scale a per-100g vector to `grams`.
///
/// Each present value becomes `round3(value * grams / 100)`; absent keys stay
/// absent. The result depends only on the inputs, so repeated calls are
/// bit-identical.
pub fn scale(per_100g: &NutrientVector, grams: f64) -> Result<NutrientVector> {
    validate_grams(grams)?;
    per_100g
        .try_map(|value| round3(value * grams / 100.0))
        .map_err(|_| NutrientError::InvalidAmount(grams))
}

/// A scaled amount that keeps its per-100g source.
///
/// Changing the amount always rescales from `per_100g`, never from the
/// previously rounded `nutrients`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Serving {
    grams: f64,
    per_100g: NutrientVector,
    nutrients: NutrientVector,
}

impl Serving {
    pub fn new(per_100g: NutrientVector, grams: f64) -> Result<Self> {
        let nutrients = scale(&per_100g, grams)?;
        Ok(Self {
            grams,
            per_100g,
            nutrients,
        })
    }

    /// Same source, different amount
    pub fn with_grams(&self, grams: f64) -> Result<Self> {
        Self::new(self.per_100g.clone(), grams)
    }

    #[must_use]
    pub const fn grams(&self) -> f64 {
        self.grams
    }

    #[must_use]
    pub const fn per_100g(&self) -> &NutrientVector {
        &self.per_100g
    }

    #[must_use]
    pub const fn nutrients(&self) -> &NutrientVector {
        &self.nutrients
    }
}
