use crate::error::NutrientError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Unit every value of a canonical key is stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NutrientUnit {
    Kcal,
    Gram,
    Milligram,
    Microgram,
}

impl NutrientUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kcal => "kcal",
            Self::Gram => "g",
            Self::Milligram => "mg",
            Self::Microgram => "mcg",
        }
    }
}

impl fmt::Display for NutrientUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declares the canonical key set and derives the key enum and the
/// fixed-schema vector from the same list.
macro_rules! canonical_nutrients {
    ($($variant:ident => $field:ident, $unit:ident;)+) => {
        /// Canonical nutrient key. The set is closed; each key has one fixed unit.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NutrientKey {
            $($variant,)+
        }

        impl NutrientKey {
            /// Every key in canonical order
            pub const ALL: &'static [NutrientKey] = &[$(NutrientKey::$variant,)+];

            /// Canonical key name, e.g. `protein_g`
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(NutrientKey::$variant => stringify!($field),)+
                }
            }

            #[must_use]
            pub const fn unit(self) -> NutrientUnit {
                match self {
                    $(NutrientKey::$variant => NutrientUnit::$unit,)+
                }
            }
        }

        impl FromStr for NutrientKey {
            type Err = NutrientError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($field) => Ok(NutrientKey::$variant),)+
                    other => Err(NutrientError::unknown_key(other)),
                }
            }
        }

        /// Per-key nutrient amounts over the canonical schema.
        ///
        /// One explicit optional field per key; values are finite and non-negative.
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct NutrientVector {
            $($field: Option<f64>,)+
        }

        impl NutrientVector {
            $(
                #[must_use]
                pub const fn $field(&self) -> Option<f64> {
                    self.$field
                }
            )+

            /// Amount stored for `key`, if present
            #[must_use]
            pub const fn get(&self, key: NutrientKey) -> Option<f64> {
                match key {
                    $(NutrientKey::$variant => self.$field,)+
                }
            }

            pub(crate) fn slot_mut(&mut self, key: NutrientKey) -> &mut Option<f64> {
                match key {
                    $(NutrientKey::$variant => &mut self.$field,)+
                }
            }
        }
    };
}

canonical_nutrients! {
    Calories => calories, Kcal;
    ProteinG => protein_g, Gram;
    CarbsG => carbs_g, Gram;
    FiberG => fiber_g, Gram;
    SugarG => sugar_g, Gram;
    FatG => fat_g, Gram;
    SaturatedFatG => saturated_fat_g, Gram;
    TransFatG => trans_fat_g, Gram;
    MonounsaturatedFatG => monounsaturated_fat_g, Gram;
    PolyunsaturatedFatG => polyunsaturated_fat_g, Gram;
    StearicAcidG => stearic_acid_g, Gram;
    Omega6G => omega_6_g, Gram;
    Omega3AlaG => omega_3_ala_g, Gram;
    Omega3EpaG => omega_3_epa_g, Gram;
    Omega3DhaG => omega_3_dha_g, Gram;
    CholesterolMg => cholesterol_mg, Milligram;
    SodiumMg => sodium_mg, Milligram;
    PotassiumMg => potassium_mg, Milligram;
    CalciumMg => calcium_mg, Milligram;
    IronMg => iron_mg, Milligram;
    MagnesiumMg => magnesium_mg, Milligram;
    PhosphorusMg => phosphorus_mg, Milligram;
    ZincMg => zinc_mg, Milligram;
    CopperMg => copper_mg, Milligram;
    ManganeseMg => manganese_mg, Milligram;
    SeleniumMcg => selenium_mcg, Microgram;
    VitaminAMcg => vitamin_a_mcg, Microgram;
    VitaminCMg => vitamin_c_mg, Milligram;
    VitaminDMcg => vitamin_d_mcg, Microgram;
    VitaminEMg => vitamin_e_mg, Milligram;
    VitaminKMcg => vitamin_k_mcg, Microgram;
    VitaminB1Mg => vitamin_b1_mg, Milligram;
    VitaminB2Mg => vitamin_b2_mg, Milligram;
    VitaminB3Mg => vitamin_b3_mg, Milligram;
    VitaminB5Mg => vitamin_b5_mg, Milligram;
    VitaminB6Mg => vitamin_b6_mg, Milligram;
    VitaminB7Mcg => vitamin_b7_mcg, Microgram;
    VitaminB9Mcg => vitamin_b9_mcg, Microgram;
    VitaminB12Mcg => vitamin_b12_mcg, Microgram;
    CaffeineMg => caffeine_mg, Milligram;
}

impl NutrientKey {
    /// Macronutrients, listed first in human-facing output
    pub const MACROS: &'static [NutrientKey] = &[
        NutrientKey::Calories,
        NutrientKey::ProteinG,
        NutrientKey::CarbsG,
        NutrientKey::FatG,
        NutrientKey::FiberG,
        NutrientKey::SugarG,
    ];

    #[must_use]
    pub fn is_macro(self) -> bool {
        Self::MACROS.contains(&self)
    }
}

impl fmt::Display for NutrientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NutrientKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NutrientKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn key_names_round_trip_and_are_unique() {
        let mut seen = HashSet::new();
        for key in NutrientKey::ALL {
            assert!(seen.insert(key.as_str()), "duplicate {key}");
            assert_eq!(key.as_str().parse::<NutrientKey>().unwrap(), *key);
        }
        assert_eq!(seen.len(), 40);
    }

    #[test]
    fn key_suffix_matches_fixed_unit() {
        for key in NutrientKey::ALL {
            let name = key.as_str();
            let expected = if name == "calories" {
                NutrientUnit::Kcal
            } else if name.ends_with("_mcg") {
                NutrientUnit::Microgram
            } else if name.ends_with("_mg") {
                NutrientUnit::Milligram
            } else {
                assert!(name.ends_with("_g"), "{name}");
                NutrientUnit::Gram
            };
            assert_eq!(key.unit(), expected, "{name}");
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = "omega3_g".parse::<NutrientKey>().unwrap_err();
        assert_eq!(err, NutrientError::UnknownKey("omega3_g".to_string()));
    }
}
