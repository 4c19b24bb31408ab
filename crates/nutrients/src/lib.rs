//! # BiteBot Nutrients
//!
//! The canonical nutrient schema shared by every lookup source.
//!
//! ## Architecture
//!
//! ```text
//! reference record (name + unitName + amount) ──┐
//!                                               ├──> normalize ──> NutrientVector (per 100 g)
//! catalog nutriments (field_100g -> value) ─────┘                       │
//!                                                                       └──> scale(grams) ──> Serving
//! ```
//!
//! Every canonical key has one fixed unit. Source values are reconciled to that
//! unit or dropped; they are never stored in a foreign unit.
//!
//! ## Example
//!
//! ```rust
//! use bitebot_nutrients::{scale, NutrientKey, NutrientVector};
//!
//! let mut per_100g = NutrientVector::new();
//! per_100g.insert(NutrientKey::ProteinG, 23.1).unwrap();
//!
//! let serving = scale(&per_100g, 150.0).unwrap();
//! assert_eq!(serving.get(NutrientKey::ProteinG), Some(34.65));
//! ```

mod error;
mod normalize;
mod portion;
mod rounding;
mod scale;
mod schema;
mod vector;

pub use error::{NutrientError, Result};
pub use normalize::{normalize_catalog, normalize_reference, SourceUnit};
pub use portion::Portion;
pub use rounding::{round3, round_to};
pub use scale::{scale, Serving};
pub use schema::{NutrientKey, NutrientUnit};
pub use vector::NutrientVector;
