//! # NSAKCET Chatbot Commands
//!
//! File: cli/src/commands/mod.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! Top-level subcommands of the `nsakcet-chatbot` binary. Each module
//! defines its clap arguments struct and a `handle_*` function that `main.rs`
//! dispatches to.
//!
//! - `serve`: run the HTTP service
//! - `check`: verify a deployment's files, catalog and template
//! - `chat`: talk to the responder from the terminal
//!

/// Runs the web service with the selected hosting backend.
pub mod serve;
/// Bootstrap check of files, catalog and page template.
pub mod check;
/// Terminal chat session against the responder.
pub mod chat;
