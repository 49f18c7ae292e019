//! # Intent Matcher
//!
//! File: cli/src/responder/matcher.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! Scores a normalized query against every pattern of every intent and picks
//! the winning intent. Patterns are normalized and tokenized once, when the
//! matcher is built, so each request only pays for its own tokenization.
//!
//! ## Scoring
//!
//! For one query/pattern pair the score lies in `[0, 1]`:
//! - `1.0` when the normalized texts are identical
//! - `0.9 * dice` otherwise, where `dice = 2|A∩B| / (|A|+|B|)` over the
//!   content-token sets of query and pattern
//! - raised to `0.8 * coverage` when the whole pattern phrase occurs inside
//!   the query on word boundaries, where `coverage` is the share of the
//!   query's content tokens the pattern accounts for (at most 1)
//!
//! Scaling the containment boost keeps a one-word pattern such as "hi" from
//! outranking the topic of a longer question like "Hi, what are the fees?".
//!
//! An intent scores the maximum over its patterns. The highest-scoring intent
//! wins; on equal scores the one earlier in the catalog wins.
//!
use super::catalog::Catalog;
use super::normalize::{content_tokens, normalize};
use std::collections::BTreeSet;

const EXACT_SCORE: f32 = 1.0;
const TOKEN_WEIGHT: f32 = 0.9;
const PHRASE_FLOOR: f32 = 0.8;

/// Normalized text plus its content tokens. Used for both queries and
/// catalog patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    text: String,
    tokens: BTreeSet<String>,
}

impl Phrase {
    /// Normalizes and tokenizes `raw`.
    pub fn new(raw: &str) -> Self {
        let text = normalize(raw);
        let tokens = content_tokens(&text);
        Self { text, tokens }
    }

    /// The normalized text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Dice coefficient of two token sets; `0.0` when both are empty.
pub fn dice(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f32 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    (2 * shared) as f32 / total as f32
}

/// True when `needle` occurs in `haystack` as a run of whole words.
fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    format!(" {haystack} ").contains(&format!(" {needle} "))
}

/// Share of the query's content tokens covered by the pattern, in `[0, 1]`.
fn coverage(query: &Phrase, pattern: &Phrase) -> f32 {
    if query.tokens.is_empty() {
        return 0.0;
    }
    (pattern.tokens.len() as f32 / query.tokens.len() as f32).min(1.0)
}

/// # Score Pattern (`score`)
///
/// Similarity of a query to one pattern.
///
/// ## Arguments
///
/// * `query`: the normalized, tokenized user message
/// * `pattern`: one normalized, tokenized catalog pattern
///
/// ## Returns
///
/// * `f32` in `[0, 1]`; `1.0` only for an exact normalized match.
pub fn score(query: &Phrase, pattern: &Phrase) -> f32 {
    // Nothing to compare against.
    if query.is_empty() || pattern.is_empty() {
        return 0.0;
    }
    // Identical after normalization: the strongest possible match.
    if query.text == pattern.text {
        return EXACT_SCORE;
    }

    // Token overlap, kept below the exact score.
    let token_score = TOKEN_WEIGHT * dice(&query.tokens, &pattern.tokens);

    // A pattern quoted inside the query earns a boost proportional to how
    // much of the query it explains.
    if contains_phrase(&query.text, &pattern.text) {
        token_score.max(PHRASE_FLOOR * coverage(query, pattern))
    } else {
        token_score
    }
}

/// Best intent for a query: its position in the catalog and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    pub index: usize,
    pub score: f32,
}

/// Pre-tokenized patterns, grouped per intent in catalog order.
#[derive(Debug, Clone)]
pub struct Matcher {
    intents: Vec<Vec<Phrase>>,
}

impl Matcher {
    /// Normalizes every pattern of `catalog` once, keeping catalog order so
    /// indices line up with `Catalog::intents`.
    pub fn new(catalog: &Catalog) -> Self {
        let intents = catalog
            .intents()
            .iter()
            .map(|intent| intent.patterns.iter().map(|p| Phrase::new(p)).collect())
            .collect();
        Self { intents }
    }

    /// Highest score among the patterns of the intent at `index`.
    pub fn intent_score(&self, index: usize, query: &Phrase) -> f32 {
        self.intents
            .get(index)
            .map(|patterns| {
                patterns
                    .iter()
                    .map(|pattern| score(query, pattern))
                    .fold(0.0_f32, f32::max)
            })
            .unwrap_or(0.0)
    }

    /// # Best Match (`best_match`)
    ///
    /// Scans intents in catalog order and keeps the first one with the
    /// highest score.
    ///
    /// ## Arguments
    ///
    /// * `query` - The tokenized user message.
    ///
    /// ## Returns
    ///
    /// * `Option<BestMatch>` - `None` only for an empty matcher. The caller
    ///   decides whether the score clears the threshold.
    pub fn best_match(&self, query: &Phrase) -> Option<BestMatch> {
        let mut best: Option<BestMatch> = None;
        for index in 0..self.intents.len() {
            let score = self.intent_score(index, query);
            // Only a strictly higher score replaces the current best, so the
            // earlier intent keeps a tie.
            match best {
                Some(current) if score <= current.score => {}
                _ => best = Some(BestMatch { index, score }),
            }
        }
        best
    }
}
