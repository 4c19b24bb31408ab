use crate::rounding::round3;
use crate::schema::{NutrientKey, NutrientUnit};
use crate::vector::NutrientVector;
use serde_json::{Map, Value};
use std::collections::HashSet;

use NutrientKey as K;

/// Unit as written by a source record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceUnit {
    Kcal,
    KiloJoule,
    Gram,
    Milligram,
    Microgram,
    InternationalUnit,
}

impl SourceUnit {
    /// Parse a unit label case-insensitively (`G`, `MG`, `UG`, `µg`, `KCAL`, `kJ`, `IU`)
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "kcal" => Some(Self::Kcal),
            "kj" => Some(Self::KiloJoule),
            "g" => Some(Self::Gram),
            "mg" => Some(Self::Milligram),
            "ug" | "µg" | "μg" | "mcg" => Some(Self::Microgram),
            "iu" => Some(Self::InternationalUnit),
            _ => None,
        }
    }

    fn micrograms(self) -> Option<f64> {
        match self {
            Self::Gram => Some(1_000_000.0),
            Self::Milligram => Some(1_000.0),
            Self::Microgram => Some(1.0),
            Self::Kcal | Self::KiloJoule | Self::InternationalUnit => None,
        }
    }

    fn is_native_for(self, unit: NutrientUnit) -> bool {
        matches!(
            (self, unit),
            (Self::Kcal, NutrientUnit::Kcal)
                | (Self::Gram, NutrientUnit::Gram)
                | (Self::Milligram, NutrientUnit::Milligram)
                | (Self::Microgram, NutrientUnit::Microgram)
        )
    }
}

fn canonical_micrograms(unit: NutrientUnit) -> Option<f64> {
    match unit {
        NutrientUnit::Gram => Some(1_000_000.0),
        NutrientUnit::Milligram => Some(1_000.0),
        NutrientUnit::Microgram => Some(1.0),
        NutrientUnit::Kcal => None,
    }
}

/// Express `amount` in the canonical unit. Energy is only accepted as kcal;
/// mass units convert by powers of 1000; everything else is rejected.
fn to_canonical(amount: f64, from: SourceUnit, to: NutrientUnit) -> Option<f64> {
    if to == NutrientUnit::Kcal {
        return (from == SourceUnit::Kcal).then_some(amount);
    }
    let from_ug = from.micrograms()?;
    let to_ug = canonical_micrograms(to)?;
    if from_ug >= to_ug {
        Some(amount * (from_ug / to_ug))
    } else {
        Some(amount / (to_ug / from_ug))
    }
}

/// Reference dataset nutrient names
const REFERENCE_NAMES: &[(&str, NutrientKey)] = &[
    ("Energy", K::Calories),
    ("Protein", K::ProteinG),
    ("Carbohydrate, by difference", K::CarbsG),
    ("Fiber, total dietary", K::FiberG),
    ("Sugars, total including NLEA", K::SugarG),
    ("Total lipid (fat)", K::FatG),
    ("Fatty acids, total saturated", K::SaturatedFatG),
    ("Fatty acids, total trans", K::TransFatG),
    ("Fatty acids, total monounsaturated", K::MonounsaturatedFatG),
    ("Fatty acids, total polyunsaturated", K::PolyunsaturatedFatG),
    ("SFA 18:0", K::StearicAcidG),
    ("PUFA 18:2", K::Omega6G),
    ("PUFA 18:3", K::Omega3AlaG),
    ("PUFA 20:5 n-3 (EPA)", K::Omega3EpaG),
    ("PUFA 22:6 n-3 (DHA)", K::Omega3DhaG),
    ("Cholesterol", K::CholesterolMg),
    ("Sodium, Na", K::SodiumMg),
    ("Potassium, K", K::PotassiumMg),
    ("Calcium, Ca", K::CalciumMg),
    ("Iron, Fe", K::IronMg),
    ("Magnesium, Mg", K::MagnesiumMg),
    ("Phosphorus, P", K::PhosphorusMg),
    ("Zinc, Zn", K::ZincMg),
    ("Copper, Cu", K::CopperMg),
    ("Manganese, Mn", K::ManganeseMg),
    ("Selenium, Se", K::SeleniumMcg),
    ("Vitamin A, RAE", K::VitaminAMcg),
    ("Vitamin C, total ascorbic acid", K::VitaminCMg),
    ("Vitamin D (D2 + D3)", K::VitaminDMcg),
    ("Vitamin E (alpha-tocopherol)", K::VitaminEMg),
    ("Vitamin K (phylloquinone)", K::VitaminKMcg),
    ("Thiamin", K::VitaminB1Mg),
    ("Riboflavin", K::VitaminB2Mg),
    ("Niacin", K::VitaminB3Mg),
    ("Pantothenic acid", K::VitaminB5Mg),
    ("Vitamin B-6", K::VitaminB6Mg),
    ("Biotin", K::VitaminB7Mcg),
    ("Folate, total", K::VitaminB9Mcg),
    ("Vitamin B-12", K::VitaminB12Mcg),
    ("Caffeine", K::CaffeineMg),
];

/// Catalog per-100g fields. Mass nutriments are published in grams.
const CATALOG_FIELDS: &[(&str, NutrientKey, SourceUnit)] = &[
    ("energy-kcal_100g", K::Calories, SourceUnit::Kcal),
    ("proteins_100g", K::ProteinG, SourceUnit::Gram),
    ("carbohydrates_100g", K::CarbsG, SourceUnit::Gram),
    ("fiber_100g", K::FiberG, SourceUnit::Gram),
    ("sugars_100g", K::SugarG, SourceUnit::Gram),
    ("fat_100g", K::FatG, SourceUnit::Gram),
    ("saturated-fat_100g", K::SaturatedFatG, SourceUnit::Gram),
    ("trans-fat_100g", K::TransFatG, SourceUnit::Gram),
    ("monounsaturated-fat_100g", K::MonounsaturatedFatG, SourceUnit::Gram),
    ("polyunsaturated-fat_100g", K::PolyunsaturatedFatG, SourceUnit::Gram),
    ("cholesterol_100g", K::CholesterolMg, SourceUnit::Gram),
    ("sodium_100g", K::SodiumMg, SourceUnit::Gram),
    ("potassium_100g", K::PotassiumMg, SourceUnit::Gram),
    ("calcium_100g", K::CalciumMg, SourceUnit::Gram),
    ("iron_100g", K::IronMg, SourceUnit::Gram),
    ("magnesium_100g", K::MagnesiumMg, SourceUnit::Gram),
    ("phosphorus_100g", K::PhosphorusMg, SourceUnit::Gram),
    ("zinc_100g", K::ZincMg, SourceUnit::Gram),
    ("copper_100g", K::CopperMg, SourceUnit::Gram),
    ("manganese_100g", K::ManganeseMg, SourceUnit::Gram),
    ("selenium_100g", K::SeleniumMcg, SourceUnit::Gram),
    ("vitamin-a_100g", K::VitaminAMcg, SourceUnit::Gram),
    ("vitamin-c_100g", K::VitaminCMg, SourceUnit::Gram),
    ("vitamin-d_100g", K::VitaminDMcg, SourceUnit::Gram),
    ("vitamin-e_100g", K::VitaminEMg, SourceUnit::Gram),
    ("vitamin-k_100g", K::VitaminKMcg, SourceUnit::Gram),
    ("vitamin-b1_100g", K::VitaminB1Mg, SourceUnit::Gram),
    ("vitamin-b2_100g", K::VitaminB2Mg, SourceUnit::Gram),
    ("vitamin-pp_100g", K::VitaminB3Mg, SourceUnit::Gram),
    ("pantothenic-acid_100g", K::VitaminB5Mg, SourceUnit::Gram),
    ("vitamin-b6_100g", K::VitaminB6Mg, SourceUnit::Gram),
    ("biotin_100g", K::VitaminB7Mcg, SourceUnit::Gram),
    ("folates_100g", K::VitaminB9Mcg, SourceUnit::Gram),
    ("vitamin-b12_100g", K::VitaminB12Mcg, SourceUnit::Gram),
    ("caffeine_100g", K::CaffeineMg, SourceUnit::Gram),
];

/// Builds a canonical vector from source entries. A value reported in the
/// key's native unit takes precedence over a converted one; otherwise the
/// first accepted value wins.
#[derive(Default)]
struct Accumulator {
    vector: NutrientVector,
    native: HashSet<NutrientKey>,
}

impl Accumulator {
    fn offer(&mut self, key: NutrientKey, amount: f64, unit: SourceUnit) {
        let Some(value) = to_canonical(amount, unit, key.unit()) else {
            log::debug!("Dropping {key}: unit {unit:?} does not reconcile to {}", key.unit());
            return;
        };
        let native = unit.is_native_for(key.unit());
        if self.vector.contains(key) && (self.native.contains(&key) || !native) {
            return;
        }
        match self.vector.insert(key, round3(value)) {
            Ok(_) => {
                if native {
                    self.native.insert(key);
                }
            }
            Err(err) => log::debug!("Dropping {key}: {err}"),
        }
    }

    fn finish(self) -> NutrientVector {
        self.vector
    }
}

/// Normalize reference-dataset nutrient entries given as `(name, unit, amount)`.
///
/// Unknown names and unreconcilable units are ignored.
pub fn normalize_reference<'a, I>(entries: I) -> NutrientVector
where
    I: IntoIterator<Item = (&'a str, &'a str, f64)>,
{
    let mut acc = Accumulator::default();
    for (name, unit_label, amount) in entries {
        let Some(&(_, key)) = REFERENCE_NAMES.iter().find(|(n, _)| *n == name) else {
            continue;
        };
        match SourceUnit::parse(unit_label) {
            Some(unit) => acc.offer(key, amount, unit),
            None => log::debug!("Dropping {key}: unrecognized unit '{unit_label}'"),
        }
    }
    acc.finish()
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Normalize a catalog `nutriments` object (per-100g fields).
///
/// Fields outside the mapping are ignored; a field whose value is not numeric
/// is dropped without affecting the others.
#[must_use]
pub fn normalize_catalog(nutriments: &Map<String, Value>) -> NutrientVector {
    let mut acc = Accumulator::default();
    for (field, key, unit) in CATALOG_FIELDS {
        let Some(raw) = nutriments.get(*field) else {
            continue;
        };
        match numeric(raw) {
            Some(amount) => acc.offer(*key, amount, *unit),
            None => log::debug!("Dropping {field}: non-numeric value {raw}"),
        }
    }
    acc.finish()
}
