//! # Chat Page Rendering
//!
//! File: cli/src/core/templating.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! Renders the HTML chat page from its Tera template. The page has no
//! per-request data, so it is rendered once at startup and the resulting
//! string is served for every `GET /`.
//!
//! ## Template Variables
//!
//! - `institution`: short institution name (e.g. "NSAKCET")
//! - `full_name`: full institution name
//! - `tagline`: one-line hint shown under the header
//! - `static_prefix`: URL prefix the static assets are mounted under
//!
use crate::core::config::SiteSettings;
use crate::core::error::{ChatbotError, Result};
use anyhow::{anyhow, Context};
use std::fs;
use std::path::Path;
use tera::Tera;
use tracing::debug;

/// URL prefix under which the static asset directory is served.
pub const STATIC_PREFIX: &str = "/static";

/// Renders template `source` with the site values. HTML autoescaping is on.
pub fn render_page(source: &str, site: &SiteSettings) -> Result<String> {
    let mut context = tera::Context::new();
    context.insert("institution", &site.institution);
    context.insert("full_name", &site.full_name);
    context.insert("tagline", &site.tagline);
    context.insert("static_prefix", STATIC_PREFIX);

    Tera::one_off(source, &context, true)
        .map_err(|e| anyhow!(ChatbotError::Template { source: e }))
}

/// # Render Chat Page (`render_chat_page`)
///
/// Reads the template file at `path` and renders it.
///
/// ## Errors
///
/// Fails if the file cannot be read or the template does not render.
pub fn render_chat_page(path: &Path, site: &SiteSettings) -> Result<String> {
    debug!("Rendering chat page from {}", path.display());
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read page template: {}", path.display()))?;
    render_page(&source, site)
        .with_context(|| format!("Failed to render page template: {}", path.display()))
}
