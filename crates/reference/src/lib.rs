//! # BiteBot Reference
//!
//! Immutable in-memory index over the bundled food composition table.
//!
//! ```text
//! dataset.json ──> parse records (malformed ones dropped)
//!                     │
//!                     ├──> normalize nutrients ──> per-100g vectors
//!                     │
//!                     └──> ReferenceIndex ── find_by_id (O(1))
//!                                         └─ search (tiered ranker)
//! ```
//!
//! [`ReferenceDataset`] owns the one-time, race-free load; after it succeeds
//! reads need no locking.

mod dataset;
mod error;
mod index;
mod model;

pub use dataset::{ReferenceDataset, DEFAULT_REFERENCE_DATA, REFERENCE_DATA_ENV};
pub use error::{ReferenceError, Result};
pub use index::{ReferenceIndex, ReferenceMatch};
pub use model::{ReferenceFood, ReferenceNutrient};
