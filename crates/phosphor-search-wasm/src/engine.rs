//! Query scoring and ranking.
//!
//! Scoring is additive over a handful of rules:
//!
//! | Rule | Points |
//! |------|--------|
//! | title equals query | 100 |
//! | title starts with query | 80 |
//! | title contains query | 60 |
//! | keywords contain query | 30 |
//! | word in title / keywords / section | 20 / 10 / 5 |
//! | word prefixes a token (no substring hit) | 6 |
//! | every word hit (multi-word queries) | 25 |
//!
//! The three title tiers are exclusive. Results are sorted by score with a
//! stable sort, so equal scores keep index order, and capped at
//! [`MAX_RESULTS`].

use std::sync::Arc;

use serde::Serialize;

use crate::{
    index::{Entry, SearchIndex},
    tokenize::{normalize_query, prefix_hit, query_words},
};

/// Maximum number of ranked results.
pub const MAX_RESULTS: usize = 8;

const TITLE_EXACT: u32 = 100;
const TITLE_PREFIX: u32 = 80;
const TITLE_CONTAINS: u32 = 60;
const KEYWORDS_CONTAIN: u32 = 30;
const WORD_IN_TITLE: u32 = 20;
const WORD_IN_KEYWORDS: u32 = 10;
const WORD_IN_SECTION: u32 = 5;
const WORD_PREFIX: u32 = 6;
const ALL_WORDS_BONUS: u32 = 25;

/// An entry together with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredMatch {
    /// The matched entry.
    pub entry: Entry,

    /// Relevance score, always at least 1.
    pub score: u32,
}

/// Search engine over a shared, immutable index.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    index: Arc<SearchIndex>,
}

impl SearchEngine {
    /// Create an engine over an index.
    pub fn new(index: impl Into<Arc<SearchIndex>>) -> Self {
        Self {
            index: index.into(),
        }
    }

    /// The underlying index.
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Rank the index against a query.
    pub fn search(&self, query: &str) -> Vec<ScoredMatch> {
        score(&self.index, query)
    }
}

/// Rank `index` against `query`.
///
/// Returns at most [`MAX_RESULTS`] matches in descending score order. An empty
/// query, or one with no word of at least two characters, matches nothing.
pub fn score(index: &SearchIndex, query: &str) -> Vec<ScoredMatch> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let q = normalize_query(query);
    let words = query_words(&q);
    if words.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, u32)> = index
        .entries()
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let s = score_entry(entry, &q, &words);
            (s > 0).then_some((i, s))
        })
        .collect();

    let candidates = scored.len();

    // `sort_by` is stable: ties stay in index order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(MAX_RESULTS);

    tracing::trace!(query = %q, words = words.len(), candidates, "Scored query");

    scored
        .into_iter()
        .map(|(i, score)| ScoredMatch {
            entry: index.entries()[i].clone(),
            score,
        })
        .collect()
}

/// Score a single entry.
///
/// `q` must already be normalized and `words` derived from it.
pub fn score_entry(entry: &Entry, q: &str, words: &[&str]) -> u32 {
    let title = entry.title.to_lowercase();
    let keywords = entry.keywords.to_lowercase();
    let section = entry.section.to_lowercase();
    let combined = format!("{title} {keywords} {section}");

    let mut score = 0;

    if title == q {
        score += TITLE_EXACT;
    } else if title.starts_with(q) {
        score += TITLE_PREFIX;
    } else if title.contains(q) {
        score += TITLE_CONTAINS;
    }

    if keywords.contains(q) {
        score += KEYWORDS_CONTAIN;
    }

    let mut word_hits = 0;
    for word in words {
        let mut hit = false;

        if title.contains(word) {
            score += WORD_IN_TITLE;
            hit = true;
        }
        if keywords.contains(word) {
            score += WORD_IN_KEYWORDS;
            hit = true;
        }
        if section.contains(word) {
            score += WORD_IN_SECTION;
            hit = true;
        }

        // Only tried when no substring rule fired for this word.
        if !hit && prefix_hit(&combined, word) {
            score += WORD_PREFIX;
            hit = true;
        }

        if hit {
            word_hits += 1;
        }
    }

    if words.len() > 1 && word_hits == words.len() {
        score += ALL_WORDS_BONUS;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, keywords: &str, section: &str) -> Entry {
        Entry::new(
            title,
            keywords,
            section,
            format!("{}.html", title.to_lowercase()),
        )
    }

    fn quickstart() -> Entry {
        entry("Quickstart Guide", "setup install", "Getting Started")
    }

    #[test]
    fn test_empty_query() {
        let index = SearchIndex::new(vec![quickstart()]);
        assert!(score(&index, "").is_empty());
        assert!(score(&index, "   \t ").is_empty());
    }

    #[test]
    fn test_single_char_words_discarded() {
        let index = SearchIndex::new(vec![entry("A", "a", "a")]);
        assert!(score(&index, "a").is_empty());
        assert!(score(&index, "a b c").is_empty());
    }

    #[test]
    fn test_title_prefix_tier() {
        // prefix 80 + word in title 20
        let q = normalize_query("quick");
        assert_eq!(score_entry(&quickstart(), &q, &query_words(&q)), 100);
    }

    #[test]
    fn test_title_exact_tier() {
        // exact 100 + two title words 40 + all-words bonus 25
        let q = normalize_query("  QuickStart Guide ");
        assert_eq!(score_entry(&quickstart(), &q, &query_words(&q)), 165);
    }

    #[test]
    fn test_title_contains_tier() {
        // contains 60 + word in title 20
        let q = normalize_query("guide");
        assert_eq!(score_entry(&quickstart(), &q, &query_words(&q)), 80);
    }

    #[test]
    fn test_keyword_and_section_hits() {
        // keywords contain query 30 + word in keywords 10
        let q = normalize_query("install");
        assert_eq!(score_entry(&quickstart(), &q, &query_words(&q)), 40);

        // word in section 5
        let q = normalize_query("started");
        assert_eq!(score_entry(&quickstart(), &q, &query_words(&q)), 5);
    }

    #[test]
    fn test_partial_multi_word_gets_no_bonus() {
        // "quick": title 20; "missing": nothing
        let q = normalize_query("quick missing");
        assert_eq!(score_entry(&quickstart(), &q, &query_words(&q)), 20);
    }

    #[test]
    fn test_no_match_scores_zero() {
        let q = normalize_query("python");
        assert_eq!(score_entry(&quickstart(), &q, &query_words(&q)), 0);
    }

    #[test]
    fn test_empty_entry_never_matches() {
        let q = normalize_query("anything");
        assert_eq!(score_entry(&Entry::default(), &q, &query_words(&q)), 0);
    }

    #[test]
    fn test_results_capped() {
        let entries = (0..20)
            .map(|i| entry(&format!("Config {i}"), "", ""))
            .collect();
        let results = score(&SearchIndex::new(entries), "config");
        assert_eq!(results.len(), MAX_RESULTS);
    }

    #[test]
    fn test_ties_keep_index_order() {
        let entries = vec![
            entry("Alpha tokens", "", ""),
            entry("Beta tokens", "", ""),
            entry("Gamma tokens", "", ""),
        ];
        let results = score(&SearchIndex::new(entries), "tokens");

        let titles: Vec<_> = results.iter().map(|m| m.entry.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha tokens", "Beta tokens", "Gamma tokens"]);
        assert!(results.iter().all(|m| m.score == results[0].score));
    }

    #[test]
    fn test_engine_search_matches_score() {
        let index = SearchIndex::new(vec![quickstart(), entry("Install", "", "Setup")]);
        let engine = SearchEngine::new(index.clone());
        assert_eq!(engine.search("install"), score(&index, "install"));
        assert_eq!(engine.index().len(), 2);
    }
}
