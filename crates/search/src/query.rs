use crate::error::{Result, SearchError};
use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,]+").expect("valid separator regex"));

/// Split on runs of whitespace and commas, dropping empty pieces.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    SEPARATORS.split(text).filter(|token| !token.is_empty())
}

/// A parsed, lower-cased query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    words: Vec<String>,
}

impl SearchQuery {
    pub fn parse(query: &str) -> Result<Self> {
        let text = query.trim().to_lowercase();
        let words: Vec<String> = tokenize(&text).map(str::to_string).collect();
        if words.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self { text, words })
    }

    /// Whole query, trimmed and lower-cased
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The query's only word, when it has exactly one
    #[must_use]
    pub fn single_word(&self) -> Option<&str> {
        match self.words.as_slice() {
            [word] => Some(word),
            _ => None,
        }
    }
}
