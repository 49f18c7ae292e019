//! # Intent Catalog
//!
//! File: cli/src/responder/catalog.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! Loads and validates the intent catalog: the ordered list of intents
//! (`tag`, example `patterns`, candidate `responses`) the responder matches
//! against. The catalog is read once at startup and never mutated afterwards.
//!
//! ## Document Format
//!
//! ```json
//! {
//!   "intents": [
//!     { "tag": "greeting", "patterns": ["Hi", "Hello"], "responses": ["Hello!"] },
//!     { "tag": "unknown", "patterns": ["I don't understand"], "responses": ["Sorry, ..."] }
//!   ]
//! }
//! ```
//!
//! ## Validation
//!
//! A catalog is rejected (and the process refuses to serve) when:
//! - a field is missing or the JSON is malformed
//! - a tag is blank or used twice
//! - an intent has no patterns or no responses
//! - a pattern normalizes to nothing, or a response is blank
//! - the same normalized pattern belongs to two different intents
//! - the fallback intent is missing, or one of its responses lacks "sorry"
//!
use super::normalize::normalize;
use crate::core::error::{ChatbotError, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Tag of the intent used when nothing matches well enough.
pub const DEFAULT_FALLBACK_TAG: &str = "unknown";

/// Every fallback response must contain this word (case-insensitive).
pub const APOLOGY_MARKER: &str = "sorry";

/// A named category of user request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Intent {
    /// Unique identifier of the intent.
    pub tag: String,
    /// Example phrases a user might type, in catalog order.
    pub patterns: Vec<String>,
    /// Candidate replies; one is returned verbatim when the intent wins.
    pub responses: Vec<String>,
}

/// On-disk shape of the catalog file.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    intents: Vec<Intent>,
}

/// Validated, immutable, ordered set of intents with a designated fallback.
#[derive(Debug, Clone)]
pub struct Catalog {
    intents: Vec<Intent>,
    fallback: usize,
}

impl Catalog {
    /// # Load Catalog (`load`)
    ///
    /// Reads the JSON document at `path` and validates it.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be read, the JSON is malformed or
    /// missing fields, or any validation rule fails. The underlying
    /// `ChatbotError` stays reachable through `downcast_ref`.
    pub fn load(path: &Path, fallback_tag: &str) -> Result<Self> {
        info!("Loading intent catalog from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read intent catalog: {}", path.display()))?;
        let catalog = Self::from_json(&content, fallback_tag)
            .with_context(|| format!("Invalid intent catalog: {}", path.display()))?;
        info!(
            "Loaded {} intents ({} patterns), fallback intent '{}'",
            catalog.len(),
            catalog.pattern_count(),
            catalog.fallback().tag
        );
        Ok(catalog)
    }

    /// Parses and validates a catalog document held in memory.
    pub fn from_json(source: &str, fallback_tag: &str) -> Result<Self> {
        let document: CatalogDocument =
            serde_json::from_str(source).map_err(|e| anyhow!(ChatbotError::from(e)))?;
        Self::new(document.intents, fallback_tag)
    }

    /// Validates `intents` and designates the intent tagged `fallback_tag`
    /// as the fallback.
    pub fn new(intents: Vec<Intent>, fallback_tag: &str) -> Result<Self> {
        validate_intents(&intents)?;

        let fallback = intents
            .iter()
            .position(|intent| intent.tag == fallback_tag)
            .ok_or_else(|| {
                anyhow!(ChatbotError::MissingFallback {
                    tag: fallback_tag.to_string()
                })
            })?;

        if let Some(response) = intents[fallback]
            .responses
            .iter()
            .find(|r| !r.to_lowercase().contains(APOLOGY_MARKER))
        {
            return Err(anyhow!(ChatbotError::FallbackWithoutApology {
                tag: fallback_tag.to_string(),
                response: response.clone(),
            }));
        }

        Ok(Self { intents, fallback })
    }

    /// All intents in catalog order.
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// The designated "no good match" intent.
    pub fn fallback(&self) -> &Intent {
        &self.intents[self.fallback]
    }

    /// Looks an intent up by tag.
    pub fn get(&self, tag: &str) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Total number of patterns across all intents.
    pub fn pattern_count(&self) -> usize {
        self.intents.iter().map(|intent| intent.patterns.len()).sum()
    }
}

/// Checks the per-intent rules: tags present and unique, non-empty pattern
/// and response lists, no blank entries, no pattern shared between intents.
fn validate_intents(intents: &[Intent]) -> Result<()> {
    let mut tags: HashSet<&str> = HashSet::new();
    let mut pattern_owner: HashMap<String, &str> = HashMap::new();

    for (index, intent) in intents.iter().enumerate() {
        let tag = intent.tag.trim();
        if tag.is_empty() {
            return Err(anyhow!(ChatbotError::BlankTag { index }));
        }
        if !tags.insert(intent.tag.as_str()) {
            return Err(anyhow!(ChatbotError::DuplicateTag {
                tag: intent.tag.clone()
            }));
        }
        if intent.patterns.is_empty() {
            return Err(anyhow!(ChatbotError::EmptyPatterns {
                tag: intent.tag.clone()
            }));
        }
        if intent.responses.is_empty() {
            return Err(anyhow!(ChatbotError::EmptyResponses {
                tag: intent.tag.clone()
            }));
        }
        if intent.responses.iter().any(|r| r.trim().is_empty()) {
            return Err(anyhow!(ChatbotError::BlankResponse {
                tag: intent.tag.clone()
            }));
        }

        for pattern in &intent.patterns {
            let normalized = normalize(pattern);
            if normalized.is_empty() {
                return Err(anyhow!(ChatbotError::BlankPattern {
                    tag: intent.tag.clone(),
                    pattern: pattern.clone(),
                }));
            }
            match pattern_owner.get(&normalized) {
                Some(owner) if *owner != intent.tag => {
                    return Err(anyhow!(ChatbotError::AmbiguousPattern {
                        pattern: pattern.clone(),
                        first: owner.to_string(),
                        second: intent.tag.clone(),
                    }));
                }
                Some(_) => debug!(
                    "Intent '{}' repeats pattern {:?}; ignoring the duplicate",
                    intent.tag, pattern
                ),
                None => {
                    pattern_owner.insert(normalized, intent.tag.as_str());
                }
            }
        }
    }

    Ok(())
}
