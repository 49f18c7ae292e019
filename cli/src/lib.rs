//! # NSAKCET Chatbot
//!
//! File: cli/src/lib.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! A rule-based FAQ chatbot for the Nawab Shah Alam Khan College of
//! Engineering and Technology. Free-text questions are matched against a
//! catalog of intents and answered with a pre-authored response, over HTTP
//! (a chat page plus a JSON endpoint) or from the terminal.
//!
//! ## Architecture
//!
//! - `responder`: normalization, catalog validation, intent matching
//! - `server`: Axum router and the hosting backends
//! - `commands`: `serve`, `check` and `chat` subcommands
//! - `core`: configuration, errors, page templating
//!
pub mod commands;
pub mod core;
pub mod responder;
pub mod server;
