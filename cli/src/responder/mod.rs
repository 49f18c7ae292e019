//! # NSAKCET Chatbot Responder
//!
//! File: cli/src/responder/mod.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! The responder maps a free-text user message to one pre-authored reply.
//! It is a pure function of the intent catalog and the query: it keeps no
//! state between calls and never fails on string input.
//!
//! ## Architecture
//!
//! - `normalize.rs`: canonical text form and content tokens
//! - `catalog.rs`: intent catalog loading and validation
//! - `matcher.rs`: query/pattern scoring and winner selection
//!
//! `Responder` ties these together. It owns the validated `Catalog` and the
//! pre-tokenized `Matcher`, and is shared read-only between request handlers
//! (wrapped in an `Arc` by the server), so no locking is needed.
//!
//! ## Examples
//!
//! ```rust,ignore
//! let catalog = Catalog::load(Path::new("assets/intents.json"), DEFAULT_FALLBACK_TAG)?;
//! let responder = Responder::new(catalog, MatchPolicy::default());
//!
//! let reply = responder.respond("What is the affiliation?");
//! assert!(reply.contains("Osmania"));
//! ```
//!
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{debug, trace};

pub mod catalog;
pub mod matcher;
pub mod normalize;

pub use catalog::{Catalog, Intent, DEFAULT_FALLBACK_TAG};
pub use matcher::{Matcher, Phrase};
pub use normalize::normalize;

/// Minimum score an intent needs to beat the fallback.
pub const DEFAULT_THRESHOLD: f32 = 0.3;

/// How the reply is picked among the winning intent's responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSelection {
    /// Uniformly at random.
    #[default]
    Random,
    /// Always the first response in the list.
    First,
}

/// Tunable matching behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    /// Scores at or below this select the fallback intent.
    pub threshold: f32,
    pub selection: ResponseSelection,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            selection: ResponseSelection::default(),
        }
    }
}

/// Outcome of classifying one query.
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    /// The selected intent (the fallback intent when nothing matched).
    pub intent: &'a Intent,
    /// Best score found, whether or not it cleared the threshold.
    pub score: f32,
    /// True when the fallback intent was selected for lack of a match.
    pub fallback: bool,
}

/// Stateless intent-matching responder over an immutable catalog.
#[derive(Debug, Clone)]
pub struct Responder {
    catalog: Catalog,
    matcher: Matcher,
    policy: MatchPolicy,
}

impl Responder {
    pub fn new(catalog: Catalog, policy: MatchPolicy) -> Self {
        let matcher = Matcher::new(&catalog);
        Self {
            catalog,
            matcher,
            policy,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// # Classify Query (`classify`)
    ///
    /// Selects the intent for `query`. An empty (after normalization) query,
    /// or a best score that does not exceed the threshold, selects the
    /// fallback intent.
    pub fn classify(&self, query: &str) -> MatchResult<'_> {
        let phrase = Phrase::new(query);
        trace!("Normalized query: {:?}", phrase.text());

        let fallback = MatchResult {
            intent: self.catalog.fallback(),
            score: 0.0,
            fallback: true,
        };

        if phrase.is_empty() {
            debug!("Empty query, using fallback intent");
            return fallback;
        }

        match self.matcher.best_match(&phrase) {
            Some(best) if best.score > self.policy.threshold => {
                let intent = &self.catalog.intents()[best.index];
                debug!("Matched intent '{}' (score {:.3})", intent.tag, best.score);
                MatchResult {
                    intent,
                    score: best.score,
                    fallback: false,
                }
            }
            Some(best) => {
                debug!(
                    "Best score {:.3} does not exceed threshold {:.3}, using fallback intent",
                    best.score, self.policy.threshold
                );
                MatchResult {
                    score: best.score,
                    ..fallback
                }
            }
            None => fallback,
        }
    }

    /// # Respond (`respond`)
    ///
    /// Returns one response, verbatim, from the intent selected by `classify`.
    pub fn respond(&self, query: &str) -> String {
        let result = self.classify(query);
        self.pick_response(result.intent)
    }

    fn pick_response(&self, intent: &Intent) -> String {
        let chosen = match self.policy.selection {
            ResponseSelection::First => intent.responses.first(),
            ResponseSelection::Random => intent.responses.choose(&mut rand::thread_rng()),
        };
        // Catalog validation guarantees at least one response per intent.
        chosen.cloned().unwrap_or_default()
    }
}
