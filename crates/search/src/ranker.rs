use crate::error::Result;
use crate::levenshtein::levenshtein;
use crate::query::{tokenize, SearchQuery};
use std::cmp::Ordering;

const EXACT_SCORE: f64 = 10_000.0;
const WHOLE_WORDS_BASE: f64 = 1_000.0;
const SUBSTRINGS_BASE: f64 = 100.0;
const FUZZY_BASE: f64 = 50.0;
const FUZZY_PENALTY_PER_EDIT: f64 = 5.0;
const PARTIAL_BASE: f64 = 10.0;

/// Rank class a candidate qualified for. Only the highest one counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Whole description equals the query
    Exact,
    /// Every query word is a whole description token
    WholeWords,
    /// Every query word occurs somewhere in the description
    Substrings,
    /// One-word query within edit distance of a description token
    Fuzzy { distance: usize },
    /// Some query word occurs somewhere in the description
    Partial,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch<K> {
    pub key: K,
    pub score: f64,
    pub tier: MatchTier,
    /// Description length in characters
    pub description_len: usize,
}

fn fuzzy_threshold(word: &str) -> usize {
    (word.chars().count() / 3).max(2)
}

impl SearchQuery {
    /// Score one description, or `None` when it matches no tier.
    #[must_use]
    pub fn score(&self, description: &str) -> Option<(MatchTier, f64)> {
        let desc = description.to_lowercase();
        let len = desc.chars().count() as f64;

        if desc == self.text() {
            return Some((MatchTier::Exact, EXACT_SCORE));
        }

        let tokens: Vec<&str> = tokenize(&desc).collect();
        if self.words().iter().all(|w| tokens.contains(&w.as_str())) {
            return Some((MatchTier::WholeWords, WHOLE_WORDS_BASE - len));
        }
        if self.words().iter().all(|w| desc.contains(w.as_str())) {
            return Some((MatchTier::Substrings, SUBSTRINGS_BASE - len));
        }

        if let Some(word) = self.single_word() {
            let nearest = tokens.iter().map(|token| levenshtein(word, token)).min();
            if let Some(distance) = nearest.filter(|d| *d <= fuzzy_threshold(word)) {
                let score = FUZZY_BASE - FUZZY_PENALTY_PER_EDIT * distance as f64 - len / 100.0;
                return Some((MatchTier::Fuzzy { distance }, score));
            }
        }

        self.words()
            .iter()
            .any(|w| desc.contains(w.as_str()))
            .then(|| (MatchTier::Partial, PARTIAL_BASE - len / 100.0))
    }
}

fn by_rank<K: Ord>(a: &RankedMatch<K>, b: &RankedMatch<K>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.description_len.cmp(&b.description_len))
        .then_with(|| a.key.cmp(&b.key))
}

/// Rank `(key, description)` candidates for `query` and keep the best `limit`.
///
/// Order: score descending, then shorter description, then smaller key.
pub fn rank<K, D, I>(query: &str, candidates: I, limit: usize) -> Result<Vec<RankedMatch<K>>>
where
    K: Ord,
    D: AsRef<str>,
    I: IntoIterator<Item = (K, D)>,
{
    let query = SearchQuery::parse(query)?;

    let mut matches: Vec<RankedMatch<K>> = candidates
        .into_iter()
        .filter_map(|(key, description)| {
            let description = description.as_ref();
            let (tier, score) = query.score(description)?;
            Some(RankedMatch {
                key,
                score,
                tier,
                description_len: description.to_lowercase().chars().count(),
            })
        })
        .collect();

    matches.sort_by(by_rank);
    matches.truncate(limit);

    log::debug!(
        "Ranked query '{}': {} matches kept (limit {})",
        query.text(),
        matches.len(),
        limit
    );

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn catalog() -> Vec<(u64, &'static str)> {
        vec![
            (1, "Breast of Lamb"),
            (2, "Chicken breast, raw"),
            (3, "Chicken, broilers or fryers, breast, meat only, cooked, roasted"),
            (4, "Kale, raw"),
            (5, "Apples, fuji, with skin, raw"),
            (6, "Chickpeas (garbanzo beans), mature seeds, canned"),
            (7, "chicken breast"),
        ]
    }

    fn keys(matches: &[RankedMatch<u64>]) -> Vec<u64> {
        matches.iter().map(|m| m.key).collect()
    }

    #[test]
    fn exact_match_ranks_first() {
        let ranked = rank("Chicken Breast", catalog(), 10).unwrap();
        assert_eq!(ranked[0].key, 7);
        assert_eq!(ranked[0].tier, MatchTier::Exact);
        assert_eq!(ranked[0].score, 10_000.0);
    }

    #[test]
    fn whole_words_beat_substrings() {
        let ranked = rank("chicken breast", catalog(), 10).unwrap();
        let pos = |k: u64| ranked.iter().position(|m| m.key == k).unwrap();
        assert!(pos(2) < pos(1));
        assert_eq!(ranked[pos(2)].tier, MatchTier::WholeWords);
        assert_eq!(ranked[pos(2)].score, 1000.0 - 19.0);
    }

    #[test]
    fn substring_tier_uses_length_penalty() {
        let query = SearchQuery::parse("breast lamb").unwrap();
        let (tier, score) = query.score("Breastbone of lambs").unwrap();
        assert_eq!(tier, MatchTier::Substrings);
        assert_eq!(score, 100.0 - 19.0);
    }

    #[test]
    fn single_word_typo_falls_to_fuzzy_tier() {
        let ranked = rank("appls", catalog(), 10).unwrap();
        assert_eq!(keys(&ranked), vec![5]);
        assert_eq!(ranked[0].tier, MatchTier::Fuzzy { distance: 1 });
        let expected = 50.0 - 5.0 - 28.0 / 100.0;
        assert!((ranked[0].score - expected).abs() < 1e-12);
    }

    #[test]
    fn fuzzy_threshold_is_at_least_two() {
        assert_eq!(fuzzy_threshold("kal"), 2);
        assert_eq!(fuzzy_threshold("strawberries"), 4);
        let query = SearchQuery::parse("xyzzy").unwrap();
        assert_eq!(query.score("Kale, raw"), None);
    }

    #[test]
    fn multi_word_query_falls_back_to_partial_tier() {
        let query = SearchQuery::parse("kale smoothie").unwrap();
        let (tier, score) = query.score("Kale, raw").unwrap();
        assert_eq!(tier, MatchTier::Partial);
        assert!((score - (10.0 - 0.09)).abs() < 1e-12);
    }

    #[test]
    fn single_word_query_scores_only_its_highest_tier() {
        // every hit contains "chick", so none is scored by edit distance
        let ranked = rank("chick", catalog(), 10).unwrap();
        assert!(ranked.iter().all(|m| m.tier == MatchTier::Substrings));
        assert_eq!(keys(&ranked), vec![7, 2, 6, 3]);
    }

    #[test]
    fn ties_prefer_shorter_description_then_key() {
        let candidates = vec![(9, "Kale, raw"), (3, "Kale, raw"), (1, "Kale, baby, raw")];
        let ranked = rank("kale", candidates, 10).unwrap();
        assert_eq!(keys(&ranked), vec![3, 9, 1]);
    }

    #[test]
    fn non_matching_candidates_are_excluded_and_limit_applies() {
        assert!(rank("quinoa", catalog(), 10).unwrap().is_empty());
        assert_eq!(rank("raw", catalog(), 2).unwrap().len(), 2);
        assert!(rank("raw", catalog(), 0).unwrap().is_empty());
    }

    #[test]
    fn empty_query_is_an_error() {
        assert!(rank("   ", catalog(), 5).is_err());
    }

    proptest! {
        #[test]
        fn proptest_order_is_independent_of_input_order(
            query in "[a-z]{1,6}( [a-z]{1,6})?",
            rotate in 0usize..7,
        ) {
            let mut shuffled = catalog();
            shuffled.rotate_left(rotate);
            let a = rank(&query, catalog(), 10).unwrap();
            let b = rank(&query, shuffled, 10).unwrap();
            prop_assert_eq!(keys(&a), keys(&b));
        }

        #[test]
        fn proptest_exact_match_always_first(pick in 0usize..7) {
            let all = catalog();
            let (key, description) = all[pick];
            let ranked = rank(&description.to_uppercase(), all.clone(), 10).unwrap();
            prop_assert_eq!(ranked[0].tier, MatchTier::Exact);
            prop_assert_eq!(ranked[0].key, key);
        }
    }
}
