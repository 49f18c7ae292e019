//! # NSAKCET Chatbot Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! Foundational pieces shared by the responder, the HTTP server and the
//! command handlers.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//! - `templating`: Rendering of the chat page template
//!
pub mod config;
pub mod error;
pub mod templating;
