//! # BiteBot Catalog
//!
//! Client for the remote crowd-sourced product catalog.
//!
//! Every call is a single GET bounded by the configured timeout. A not-found
//! response yields `None` / an empty list; any other failure is returned as a
//! [`CatalogError`] for that call only. Nothing is retried or cached.

mod client;
mod config;
mod country;
mod error;
mod model;

pub use client::{CatalogClient, CatalogSource, SEARCH_FIELDS};
pub use config::CatalogConfig;
pub use country::country_code;
pub use error::{CatalogError, Result};
pub use model::CatalogProduct;
