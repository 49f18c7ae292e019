//! # NSAKCET Chatbot Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`: a command
//! builder for the compiled binary and a router built from the bundled
//! assets.
//!

// Allow potentially unused code in this common module, as different test files might use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use nsakcet_chatbot::core::config::Settings;
use nsakcet_chatbot::server::{build_state, create_app};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Root of the `cli` package, where the bundled `assets/` live.
pub fn package_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// # Get Chatbot Command (`chatbot_cmd`)
///
/// An `assert_cmd::Command` for the compiled `nsakcet-chatbot` binary, run
/// from the package directory so the default asset paths resolve. `PORT`
/// and `RUST_LOG` are cleared so the caller's environment cannot leak in.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn chatbot_cmd() -> Command {
    let mut cmd = Command::cargo_bin("nsakcet-chatbot")
        .expect("Failed to find nsakcet-chatbot binary for testing");
    cmd.current_dir(package_dir())
        .env_remove("PORT")
        .env_remove("RUST_LOG");
    cmd
}

/// Settings pointing at the bundled assets, independent of the working directory.
pub fn bundled_settings() -> Settings {
    let mut settings = Settings::default();
    let root = package_dir();
    settings.assets.intents = root.join("assets/intents.json");
    settings.assets.template = root.join("assets/templates/index.html");
    settings.assets.static_dir = root.join("assets/static");
    settings
}

/// The service router over the bundled assets.
pub fn bundled_app() -> axum::Router {
    app_for(&bundled_settings())
}

pub fn app_for(settings: &Settings) -> axum::Router {
    let state = build_state(settings).expect("bundled assets should load");
    create_app(
        Arc::new(state),
        &settings.assets.static_dir,
        settings.server.enable_cors,
    )
}

/// Copies the bundled assets into `dir` with the same layout.
pub fn copy_bundled_assets(dir: &Path) {
    let src = package_dir().join("assets");
    for relative in [
        "intents.json",
        "templates/index.html",
        "static/js/script.js",
        "static/css/style.css",
    ] {
        let target = dir.join(relative);
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::copy(src.join(relative), target).unwrap();
    }
}
