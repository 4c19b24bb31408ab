use crate::error::{ReferenceError, Result};
use crate::model::{RawFood, ReferenceFood};
use bitebot_search::{rank, MatchTier};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Member holding the records in the bundled dataset export
const RECORDS_KEY: &str = "FoundationFoods";

/// A ranked hit from [`ReferenceIndex::search`]
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceMatch<'a> {
    pub food: &'a ReferenceFood,
    pub score: f64,
    pub tier: MatchTier,
}

/// Immutable in-memory reference dataset
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    foods: Vec<ReferenceFood>,
    by_id: HashMap<u64, usize>,
    dropped_records: usize,
}

impl ReferenceIndex {
    pub fn from_foods(foods: Vec<ReferenceFood>) -> Self {
        Self::build(foods, 0)
    }

    fn build(foods: Vec<ReferenceFood>, dropped_records: usize) -> Self {
        let mut by_id = HashMap::with_capacity(foods.len());
        for (idx, food) in foods.iter().enumerate() {
            if by_id.contains_key(&food.id()) {
                log::warn!("Duplicate reference id {}; keeping first record", food.id());
                continue;
            }
            by_id.insert(food.id(), idx);
        }
        Self {
            foods,
            by_id,
            dropped_records,
        }
    }

    /// Parse a dataset document.
    ///
    /// Accepts a top-level array of records or an object holding them under
    /// `FoundationFoods`. Other wrapper objects fall back to their array-valued
    /// member with the alphabetically first key. Records that fail to parse
    /// are dropped and counted.
    pub fn from_json_value(document: Value) -> Result<Self> {
        let records = match document {
            Value::Array(records) => records,
            Value::Object(mut map) => match map.remove(RECORDS_KEY) {
                Some(Value::Array(records)) => records,
                _ => map
                    .into_iter()
                    .find_map(|(_, v)| match v {
                        Value::Array(records) => Some(records),
                        _ => None,
                    })
                    .ok_or(ReferenceError::MissingRecords)?,
            },
            _ => return Err(ReferenceError::MissingRecords),
        };

        let total = records.len();
        let mut foods = Vec::with_capacity(total);
        for (position, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<RawFood>(record) {
                Ok(raw) => foods.push(ReferenceFood::from(raw)),
                Err(err) => log::debug!("Dropping malformed reference record #{position}: {err}"),
            }
        }

        let dropped = total - foods.len();
        if dropped > 0 {
            log::warn!("Dropped {dropped} of {total} malformed reference records");
        }
        Ok(Self::build(foods, dropped))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Self::from_json_value(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let index = Self::from_reader(std::io::BufReader::new(file))?;
        log::info!(
            "Loaded {} reference foods from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    /// Exact id lookup
    #[must_use]
    pub fn find_by_id(&self, id: u64) -> Option<&ReferenceFood> {
        self.by_id.get(&id).map(|&idx| &self.foods[idx])
    }

    /// Up to `limit` foods ranked against `query`
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<ReferenceMatch<'_>>> {
        // (id, position) keeps duplicate ids distinct and ordered
        let candidates = self
            .foods
            .iter()
            .enumerate()
            .map(|(idx, food)| ((food.id(), idx), food.description()));

        let ranked = rank(query, candidates, limit)?;
        Ok(ranked
            .into_iter()
            .map(|m| ReferenceMatch {
                food: &self.foods[m.key.1],
                score: m.score,
                tier: m.tier,
            })
            .collect())
    }

    pub fn foods(&self) -> &[ReferenceFood] {
        &self.foods
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Records skipped at load because they did not parse
    #[must_use]
    pub const fn dropped_records(&self) -> usize {
        self.dropped_records
    }
}
