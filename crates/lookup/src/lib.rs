//! # BiteBot Lookup
//!
//! Reference-first nutrition search over two sources:
//!
//! ```text
//! query ──> ReferenceIndex::search (limit) ──┐
//!       └─> CatalogSource::search_by_text ───┴──> reference ++ catalog
//! ```
//!
//! Results are concatenated, never re-ranked across sources. A failing
//! source becomes a [`SourceReport`] warning instead of an error.
//!
//! ## Example
//!
//! ```no_run
//! use bitebot_lookup::{LookupConfig, NutritionLookup};
//!
//! # async fn demo() -> bitebot_lookup::Result<()> {
//! let config = LookupConfig::load(None)?;
//! let lookup = NutritionLookup::from_config(&config)?;
//! let outcome = lookup.search_all("greek yogurt", 5, None, None).await?;
//! for warning in outcome.warnings() {
//!     eprintln!("warning: {warning}");
//! }
//! if let Some(first) = outcome.results.first() {
//!     let serving = first.serving(170.0)?;
//!     println!("{}: {:?} kcal", first.name, serving.nutrients().calories());
//! }
//! # Ok(())
//! # }
//! ```

mod aggregator;
mod config;
mod error;
mod result;

pub use aggregator::{NutritionLookup, SearchOutcome, SourceFilter, SourceReport, SourceStatus};
pub use config::{
    LookupConfig, CATALOG_TIMEOUT_ENV, CATALOG_URL_ENV, CONFIG_ENV, DEFAULT_LIMIT,
};
pub use error::{LookupError, Result};
pub use result::{SearchResult, Source, SourceKey};
