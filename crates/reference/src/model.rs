use bitebot_nutrients::{normalize_reference, round_to, NutrientVector, Portion};
use serde::{Deserialize, Serialize};

const DEFAULT_PORTION_LABEL: &str = "portion";

/// Dataset record as stored on disk
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawFood {
    #[serde(alias = "id")]
    fdc_id: u64,
    description: String,
    #[serde(default)]
    food_nutrients: Vec<RawNutrientEntry>,
    #[serde(default)]
    food_portions: Vec<RawPortion>,
}

#[derive(Debug, Deserialize)]
struct RawNutrientEntry {
    nutrient: RawNutrient,
    #[serde(default)]
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNutrient {
    name: String,
    #[serde(default)]
    unit_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPortion {
    #[serde(default)]
    portion_description: Option<String>,
    #[serde(default)]
    measure_unit: Option<RawMeasureUnit>,
    #[serde(default)]
    gram_weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawMeasureUnit {
    #[serde(default)]
    name: Option<String>,
}

impl RawPortion {
    fn into_portion(self) -> Option<Portion> {
        let grams = self.gram_weight.filter(|g| g.is_finite() && *g > 0.0)?;
        let label = self
            .portion_description
            .filter(|d| !d.trim().is_empty())
            .or_else(|| self.measure_unit.and_then(|u| u.name))
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PORTION_LABEL.to_string());
        Some(Portion::new(label, round_to(grams, 1)))
    }
}

/// One nutrient entry exactly as the dataset reports it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceNutrient {
    pub name: String,
    pub unit: String,
    pub amount: f64,
}

/// An immutable reference food with its normalized per-100g vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceFood {
    id: u64,
    description: String,
    nutrients: Vec<ReferenceNutrient>,
    portions: Vec<Portion>,
    per_100g: NutrientVector,
}

impl ReferenceFood {
    /// Build a food from raw nutrient entries; the canonical vector is derived once here.
    pub fn new(
        id: u64,
        description: impl Into<String>,
        nutrients: Vec<ReferenceNutrient>,
        portions: Vec<Portion>,
    ) -> Self {
        let per_100g = normalize_reference(
            nutrients
                .iter()
                .map(|n| (n.name.as_str(), n.unit.as_str(), n.amount)),
        );
        Self {
            id,
            description: description.into(),
            nutrients,
            portions,
            per_100g,
        }
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Source nutrient entries that carried an amount
    #[must_use]
    pub fn nutrients(&self) -> &[ReferenceNutrient] {
        &self.nutrients
    }

    #[must_use]
    pub fn portions(&self) -> &[Portion] {
        &self.portions
    }

    #[must_use]
    pub const fn per_100g(&self) -> &NutrientVector {
        &self.per_100g
    }
}

impl From<RawFood> for ReferenceFood {
    fn from(raw: RawFood) -> Self {
        let nutrients = raw
            .food_nutrients
            .into_iter()
            .filter_map(|entry| {
                let amount = entry.amount?;
                Some(ReferenceNutrient {
                    name: entry.nutrient.name,
                    unit: entry.nutrient.unit_name,
                    amount,
                })
            })
            .collect();
        let portions = raw
            .food_portions
            .into_iter()
            .filter_map(RawPortion::into_portion)
            .collect();
        Self::new(raw.fdc_id, raw.description, nutrients, portions)
    }
}
