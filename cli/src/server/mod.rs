//! # NSAKCET Chatbot HTTP Service
//!
//! File: cli/src/server/mod.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! The web front of the chatbot: the chat page, the JSON answer endpoint and
//! the static assets, hosted by one of several interchangeable backends.
//!
//! ## Architecture
//!
//! - `routes.rs`: Axum router, handlers and shared `AppState`
//! - `error.rs`: JSON error bodies for rejected requests
//! - `backend.rs`: hosting strategies (`dev`, `production`, `compat`)
//! - `utils.rs`: shutdown signals, port probing, local IP detection
//!
//! Startup is strictly ordered: every required file is checked, the catalog
//! is loaded and validated, and the page is rendered before any socket is
//! bound, so a broken deployment fails fast with exit code 1.
//!
use crate::core::config::{AssetPaths, Settings};
use crate::core::error::{ChatbotError, Result};
use crate::core::templating;
use crate::responder::{Catalog, Responder};
use anyhow::anyhow;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub mod backend;
pub mod error;
pub mod routes;
pub mod utils;

pub use backend::{backend_for, Backend, ServerKind};
pub use routes::{create_app, AppState, ChatRequest, ChatResponse};

/// Files the service cannot start without, in the order they are reported.
pub fn required_files(assets: &AssetPaths) -> Vec<PathBuf> {
    vec![
        assets.intents.clone(),
        assets.template.clone(),
        assets.static_dir.join("js").join("script.js"),
        assets.static_dir.join("css").join("style.css"),
    ]
}

/// Subset of `required_files` that does not exist.
pub fn missing_files(assets: &AssetPaths) -> Vec<PathBuf> {
    required_files(assets)
        .into_iter()
        .filter(|path| !path.is_file())
        .collect()
}

/// Loads and validates the catalog named in `settings` and wraps it in a
/// `Responder` with the configured policy.
pub fn load_responder(settings: &Settings) -> Result<Responder> {
    let catalog = Catalog::load(&settings.assets.intents, &settings.responder.fallback_tag)?;
    Ok(Responder::new(catalog, settings.responder.policy()))
}

/// # Build Application State (`build_state`)
///
/// Runs every startup step that can fail before binding: checks required
/// files, loads the responder, and renders the page.
///
/// ## Errors
///
/// - `ChatbotError::MissingFiles` when any required file is absent
/// - any catalog validation or template rendering error
pub fn build_state(settings: &Settings) -> Result<AppState> {
    // 1. Report every missing file at once, not just the first.
    let missing = missing_files(&settings.assets);
    if !missing.is_empty() {
        return Err(anyhow!(ChatbotError::MissingFiles(
            missing.iter().map(|p| p.display().to_string()).collect()
        )));
    }

    // 2. Catalog, then the page. Either failing stops startup before bind.
    let responder = load_responder(settings)?;
    let page = templating::render_chat_page(&settings.assets.template, &settings.site)?;
    info!(
        "Responder ready: {} intents, {} patterns",
        responder.catalog().len(),
        responder.catalog().pattern_count()
    );

    Ok(AppState {
        responder,
        page,
        max_message_chars: settings.server.max_message_chars,
    })
}

/// # Run Service (`run`)
///
/// Builds the state and router, then hands them to the configured backend.
/// Blocks until shutdown.
pub fn run(settings: &Settings) -> Result<()> {
    let state = Arc::new(build_state(settings)?);
    let app = create_app(
        state,
        &settings.assets.static_dir,
        settings.server.enable_cors,
    );
    let backend = backend_for(settings.server.backend);
    info!("Using the {} backend", backend.kind().name());
    backend.run(app, &settings.server)
}
