use crate::error::{NutrientError, Result};
use crate::rounding::round3;
use crate::schema::NutrientKey;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub use crate::schema::NutrientVector;

impl NutrientVector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous amount.
    ///
    /// NaN, infinite and negative values are rejected.
    pub fn insert(&mut self, key: NutrientKey, value: f64) -> Result<Option<f64>> {
        if !value.is_finite() || value < 0.0 {
            return Err(NutrientError::InvalidValue { key, value });
        }
        // -0.0 would otherwise serialize as "-0"
        let value = if value == 0.0 { 0.0 } else { value };
        Ok(self.slot_mut(key).replace(value))
    }

    pub fn remove(&mut self, key: NutrientKey) -> Option<f64> {
        self.slot_mut(key).take()
    }

    #[must_use]
    pub fn contains(&self, key: NutrientKey) -> bool {
        self.get(key).is_some()
    }

    /// Present entries in canonical key order
    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, f64)> + '_ {
        NutrientKey::ALL
            .iter()
            .filter_map(move |key| self.get(*key).map(|value| (*key, value)))
    }

    /// Number of present keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Key-wise sum rounded to 3 decimals. A key present on one side only is
    /// carried over unchanged.
    pub fn checked_add(&self, other: &NutrientVector) -> Result<NutrientVector> {
        let mut out = NutrientVector::new();
        for key in NutrientKey::ALL {
            let sum = match (self.get(*key), other.get(*key)) {
                (Some(a), Some(b)) => round3(a + b),
                (Some(a), None) | (None, Some(a)) => a,
                (None, None) => continue,
            };
            out.insert(*key, sum)?;
        }
        Ok(out)
    }

    /// Apply `f` to every present value; absent keys stay absent.
    pub(crate) fn try_map(&self, f: impl Fn(f64) -> f64) -> Result<NutrientVector> {
        let mut out = NutrientVector::new();
        for (key, value) in self.iter() {
            out.insert(key, f(value))?;
        }
        Ok(out)
    }
}

impl TryFrom<Vec<(NutrientKey, f64)>> for NutrientVector {
    type Error = NutrientError;

    fn try_from(pairs: Vec<(NutrientKey, f64)>) -> Result<Self> {
        let mut vector = NutrientVector::new();
        for (key, value) in pairs {
            vector.insert(key, value)?;
        }
        Ok(vector)
    }
}

impl Serialize for NutrientVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.as_str(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NutrientVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct VectorVisitor;

        impl<'de> Visitor<'de> for VectorVisitor {
            type Value = NutrientVector;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of canonical nutrient keys to non-negative numbers")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<NutrientVector, A::Error> {
                let mut vector = NutrientVector::new();
                while let Some((key, value)) = access.next_entry::<NutrientKey, f64>()? {
                    vector
                        .insert(key, value)
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(vector)
            }
        }

        deserializer.deserialize_map(VectorVisitor)
    }
}
