//! # Check Command
//!
//! File: cli/src/commands/check.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! `nsakcet-chatbot check` verifies that a deployment can start:
//! 1. The catalog, the page template, `js/script.js` and `css/style.css` exist
//! 2. The catalog parses and validates
//! 3. The page template renders
//!
//! Each step prints its outcome. The command fails (exit code 1) on the first
//! step that does not pass; missing files are all listed before failing.
//!
use crate::core::config::{self, ConfigArgs};
use crate::core::error::{ChatbotError, Result};
use crate::core::templating;
use crate::server;
use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::info;

/// Arguments for the `check` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// # Handle Check Command (`handle_check`)
pub fn handle_check(args: CheckArgs) -> Result<()> {
    info!("Handling check command...");
    let settings = config::load_settings(&args.config, None)?;
    if let Some(source) = &settings.source {
        println!("Using configuration file: {}", source.display());
    }

    println!("Checking required files...");
    let mut missing = Vec::new();
    for path in server::required_files(&settings.assets) {
        if path.is_file() {
            println!("  - {}... Found.", path.display());
        } else {
            println!("  - {}... Missing.", path.display());
            missing.push(path.display().to_string());
        }
    }
    if !missing.is_empty() {
        println!("⚠️ Some required files are missing.");
        return Err(anyhow!(ChatbotError::MissingFiles(missing)));
    }

    println!("Validating intent catalog...");
    let responder = server::load_responder(&settings)?;
    let catalog = responder.catalog();
    println!(
        "  - {} intents, {} patterns, fallback '{}'.",
        catalog.len(),
        catalog.pattern_count(),
        catalog.fallback().tag
    );

    println!("Rendering chat page...");
    let page = templating::render_chat_page(&settings.assets.template, &settings.site)
        .context("Page template check failed")?;
    println!("  - {} bytes rendered.", page.len());

    println!("✅ All checks passed.");
    Ok(())
}
