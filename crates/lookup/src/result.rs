use crate::error::Result;
use bitebot_catalog::CatalogProduct;
use bitebot_nutrients::{NutrientVector, Portion, Serving};
use bitebot_reference::ReferenceFood;
use serde::Serialize;
use std::fmt;

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Reference,
    Catalog,
}

impl Source {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Catalog => "catalog",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of a result within its source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKey {
    Reference(u64),
    Barcode(String),
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference(id) => write!(f, "{id}"),
            Self::Barcode(code) => f.write_str(code),
        }
    }
}

/// One food from either source, already normalized to the canonical schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub source: Source,
    pub key: SourceKey,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutriscore: Option<String>,
    pub per_100g: NutrientVector,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub portions: Vec<Portion>,
}

impl SearchResult {
    #[must_use]
    pub fn from_reference(food: &ReferenceFood) -> Self {
        Self {
            source: Source::Reference,
            key: SourceKey::Reference(food.id()),
            name: food.description().to_string(),
            brand: None,
            quantity: None,
            nutriscore: None,
            per_100g: food.per_100g().clone(),
            portions: food.portions().to_vec(),
        }
    }

    #[must_use]
    pub fn from_catalog(product: CatalogProduct) -> Self {
        let per_100g = product.per_100g();
        Self {
            source: Source::Catalog,
            key: SourceKey::Barcode(product.barcode),
            name: product.name,
            brand: product.brand,
            quantity: product.quantity,
            nutriscore: product.nutriscore,
            per_100g,
            portions: Vec::new(),
        }
    }

    /// Nutrients for `grams` of this food, always computed from the per-100g vector
    pub fn serving(&self, grams: f64) -> Result<Serving> {
        Ok(Serving::new(self.per_100g.clone(), grams)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitebot_reference::ReferenceNutrient;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn oats() -> ReferenceFood {
        ReferenceFood::new(
            173_904,
            "Oats, whole grain",
            vec![ReferenceNutrient {
                name: "Protein".to_string(),
                unit: "G".to_string(),
                amount: 13.2,
            }],
            vec![Portion::new("cup", 81.0)],
        )
    }

    #[test]
    fn reference_result_keeps_portions() {
        let result = SearchResult::from_reference(&oats());
        assert_eq!(result.key, SourceKey::Reference(173_904));
        assert_eq!(result.portions.len(), 1);
        assert_eq!(result.per_100g.protein_g(), Some(13.2));
    }

    #[test]
    fn catalog_result_carries_product_metadata() {
        let product = CatalogProduct::from_json(json!({
            "code": "737628064502",
            "product_name": "Rice noodles",
            "brands": "Thai Kitchen",
            "nutriscore_grade": "c",
            "nutriments": {"carbohydrates_100g": 80.0},
        }))
        .unwrap();
        let result = SearchResult::from_catalog(product);
        assert_eq!(result.source, Source::Catalog);
        assert_eq!(result.key.to_string(), "737628064502");
        assert_eq!(result.brand.as_deref(), Some("Thai Kitchen"));
        assert_eq!(result.nutriscore.as_deref(), Some("C"));
        assert!(result.portions.is_empty());
    }

    #[test]
    fn serving_scales_from_per_100g() {
        let result = SearchResult::from_reference(&oats());
        let serving = result.serving(40.0).unwrap();
        assert_eq!(serving.nutrients().protein_g(), Some(5.28));
        assert_eq!(serving.with_grams(40.0).unwrap(), serving);
        assert!(result.serving(-1.0).is_err());
    }

    #[test]
    fn serializes_compactly() {
        let value = serde_json::to_value(SearchResult::from_reference(&oats())).unwrap();
        assert_eq!(value["source"], "reference");
        assert_eq!(value["key"], json!({"reference": 173_904}));
        assert_eq!(value["per_100g"]["protein_g"], 13.2);
        assert!(value.get("brand").is_none());
    }
}
