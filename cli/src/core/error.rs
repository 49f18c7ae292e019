//! # NSAKCET Chatbot Error Types
//!
//! File: cli/src/core/error.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! This module defines the error types used throughout the chatbot service.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ChatbotError`: A custom error enum using `thiserror` for the failure
//!   conditions the service needs to tell apart (catalog validation, config,
//!   missing files, template rendering)
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible propagation
//!   with added context
//!
//! Catalog errors are fatal at startup: `serve`, `check` and `chat` all refuse
//! to continue when the catalog does not validate.
//!
//! ## Examples
//!
//! ```rust,ignore
//! // Return a specific error type
//! if intent.patterns.is_empty() {
//!     return Err(ChatbotError::EmptyPatterns { tag: intent.tag.clone() })?;
//! }
//!
//! // Pattern matching on error types
//! match Catalog::load(&path, "unknown") {
//!     Err(e) if matches!(e.downcast_ref::<ChatbotError>(), Some(ChatbotError::DuplicateTag { .. })) => {
//!         eprintln!("Two intents share a tag");
//!     }
//!     other => { /* ... */ }
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the chatbot service.
#[derive(Error, Debug)]
pub enum ChatbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog document is invalid: {source}")]
    CatalogParse {
        #[from]
        source: serde_json::Error,
    },

    #[error("Intent #{index} has an empty tag.")]
    BlankTag { index: usize },

    #[error("Intent '{tag}' appears more than once in the catalog.")]
    DuplicateTag { tag: String },

    #[error("Intent '{tag}' has no patterns.")]
    EmptyPatterns { tag: String },

    #[error("Intent '{tag}' has no responses.")]
    EmptyResponses { tag: String },

    #[error("Intent '{tag}' has a pattern with no matchable text: {pattern:?}")]
    BlankPattern { tag: String, pattern: String },

    #[error("Intent '{tag}' has an empty response.")]
    BlankResponse { tag: String },

    #[error("Pattern {pattern:?} is claimed by both '{first}' and '{second}'.")]
    AmbiguousPattern {
        pattern: String,
        first: String,
        second: String,
    },

    #[error("Fallback intent '{tag}' is missing from the catalog.")]
    MissingFallback { tag: String },

    #[error("Fallback intent '{tag}' has a response without an apology: {response:?}")]
    FallbackWithoutApology { tag: String, response: String },

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("Required files are missing: {}", .0.join(", "))]
    MissingFiles(Vec<String>),

    #[error("Server error: {0}")]
    Server(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
