use bitebot_nutrients::{normalize_catalog, NutrientVector};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const UNKNOWN_PRODUCT_NAME: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct RawProduct {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    brands: Option<String>,
    #[serde(default)]
    quantity: Option<String>,
    #[serde(default)]
    nutriscore_grade: Option<String>,
    #[serde(default)]
    categories_tags: Option<Vec<String>>,
    #[serde(default)]
    nutriments: Option<Map<String, Value>>,
}

/// A catalog product as returned by one call. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogProduct {
    pub barcode: String,
    pub name: String,
    pub brand: Option<String>,
    pub quantity: Option<String>,
    /// Upper-cased quality grade (A-E)
    pub nutriscore: Option<String>,
    pub categories: Vec<String>,
    /// Raw per-100g nutriment fields
    pub nutriments: Map<String, Value>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CatalogProduct {
    /// Decode one product object. Barcodes may arrive as strings or numbers.
    pub fn from_json(value: Value) -> serde_json::Result<Self> {
        let raw: RawProduct = serde_json::from_value(value)?;
        let barcode = match raw.code {
            Some(Value::String(code)) => code,
            Some(Value::Number(code)) => code.to_string(),
            _ => String::new(),
        };
        Ok(Self {
            barcode,
            name: non_blank(raw.product_name).unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
            brand: non_blank(raw.brands),
            quantity: non_blank(raw.quantity),
            nutriscore: non_blank(raw.nutriscore_grade).map(|g| g.to_uppercase()),
            categories: raw.categories_tags.unwrap_or_default(),
            nutriments: raw.nutriments.unwrap_or_default(),
        })
    }

    /// Canonical per-100g vector
    #[must_use]
    pub fn per_100g(&self) -> NutrientVector {
        normalize_catalog(&self.nutriments)
    }
}
