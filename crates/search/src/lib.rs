//! Deterministic tiered ranking of free-text food queries against descriptions.
//!
//! A candidate is scored by the single highest tier it qualifies for:
//!
//! ```text
//! 1. exact (case-insensitive)        10000
//! 2. every query word is a token     1000 - len
//! 3. every query word is a substring 100 - len
//! 4. one-word query, edit distance   50 - 5d - len/100
//! 5. any query word is a substring   10 - len/100
//! ```
//!
//! Ties are broken by shorter description, then by candidate key, so the
//! output order never depends on input or hash order.

mod error;
mod levenshtein;
mod query;
mod ranker;

pub use error::{Result, SearchError};
pub use levenshtein::levenshtein;
pub use query::{tokenize, SearchQuery};
pub use ranker::{rank, MatchTier, RankedMatch};
