//! # NSAKCET Chatbot Configuration
//!
//! File: cli/src/core/config.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! This module handles configuration loading, merging, and validation for the
//! chatbot service. It combines settings from:
//! 1. Command-line arguments (highest priority)
//! 2. A `chatbot.toml` file (explicit `--config`, the current directory, or the
//!    per-user config directory, in that order)
//! 3. Default values (lowest priority)
//!
//! ## Architecture
//!
//! The configuration system follows these steps:
//! 1. Locate the configuration file (if any)
//! 2. Parse it into `FileConfig`, where every field is optional
//! 3. Layer file values over `Settings::default()`, resolving relative paths
//!    against the directory containing the file
//! 4. Layer explicitly given command-line values over the result
//! 5. Expand `~` in paths and validate the final `Settings`
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//! workers = 4
//! backend = "production"   # dev | production | compat
//! enable_cors = false
//! max_message_chars = 1000
//!
//! [assets]
//! intents = "assets/intents.json"
//! template = "assets/templates/index.html"
//! static_dir = "assets/static"
//!
//! [responder]
//! fallback_tag = "unknown"
//! threshold = 0.3
//! selection = "random"      # random | first
//!
//! [site]
//! institution = "NSAKCET"
//! ```
//!
use crate::core::error::{ChatbotError, Result};
use crate::responder::{MatchPolicy, ResponseSelection, DEFAULT_FALLBACK_TAG, DEFAULT_THRESHOLD};
use crate::server::backend::ServerKind;
use anyhow::{anyhow, Context};
use clap::Args;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the configuration file looked up in the current directory and in
/// the per-user config directory.
pub const CONFIG_FILE_NAME: &str = "chatbot.toml";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default upper bound on the length of an incoming message, in characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 1000;

/// File whose presence marks a directory as holding the bundled `assets/`.
const ASSET_MARKER: &str = "assets/intents.json";

/// # Shared Configuration Arguments (`ConfigArgs`)
///
/// Options accepted by every subcommand that loads the catalog. All of them
/// are optional: anything left out falls back to the config file, then to the
/// built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a chatbot.toml configuration file.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the intent catalog (JSON).
    #[arg(long, value_name = "FILE")]
    pub intents: Option<PathBuf>,

    /// Path to the chat page template.
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Directory holding the page's static assets (js/, css/).
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,

    /// Minimum match score (0.0 - 1.0) before the fallback answer is used.
    #[arg(long)]
    pub threshold: Option<f32>,

    /// How a reply is picked among the matched intent's responses.
    #[arg(long, value_enum)]
    pub selection: Option<ResponseSelection>,
}

/// # Listener Arguments (`ListenArgs`)
///
/// Options that only matter when actually serving HTTP.
#[derive(Args, Debug, Clone, Default)]
pub struct ListenArgs {
    /// Network address to bind to (default: 0.0.0.0).
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on (default: 5000).
    #[arg(long, short, env = "PORT")]
    pub port: Option<u16>,

    /// Number of worker threads (production backend only).
    #[arg(long, short)]
    pub workers: Option<usize>,

    /// Hosting backend to run the service with.
    #[arg(long, value_enum)]
    pub server: Option<ServerKind>,

    /// Send permissive CORS headers.
    #[arg(long)]
    pub cors: bool,
}

/// Network-facing settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    pub workers: Option<usize>,
    pub backend: ServerKind,
    pub enable_cors: bool,
    pub max_message_chars: usize,
}

/// Locations of the files the service needs at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPaths {
    pub intents: PathBuf,
    pub template: PathBuf,
    pub static_dir: PathBuf,
}

impl AssetPaths {
    /// The bundled layout (`assets/intents.json`, `assets/templates/index.html`,
    /// `assets/static`) below `root`.
    pub fn under(root: &Path) -> Self {
        let assets = root.join("assets");
        Self {
            intents: assets.join("intents.json"),
            template: assets.join("templates").join("index.html"),
            static_dir: assets.join("static"),
        }
    }
}

/// Matching behaviour of the responder.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponderSettings {
    pub fallback_tag: String,
    pub threshold: f32,
    pub selection: ResponseSelection,
}

impl ResponderSettings {
    pub fn policy(&self) -> MatchPolicy {
        MatchPolicy {
            threshold: self.threshold,
            selection: self.selection,
        }
    }
}

/// Values rendered into the chat page.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSettings {
    pub institution: String,
    pub full_name: String,
    pub tagline: String,
}

/// # Effective Configuration (`Settings`)
///
/// The final, merged and validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub assets: AssetPaths,
    pub responder: ResponderSettings,
    pub site: SiteSettings,
    /// The configuration file that was applied, if any.
    pub source: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                port: DEFAULT_PORT,
                workers: None,
                backend: ServerKind::default(),
                enable_cors: false,
                max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            },
            assets: AssetPaths::under(Path::new("")),
            responder: ResponderSettings {
                fallback_tag: DEFAULT_FALLBACK_TAG.to_string(),
                threshold: DEFAULT_THRESHOLD,
                selection: ResponseSelection::default(),
            },
            site: SiteSettings {
                institution: "NSAKCET".to_string(),
                full_name: "Nawab Shah Alam Khan College of Engineering and Technology".to_string(),
                tagline: "Ask me about admissions, programs, fees and campus facilities."
                    .to_string(),
            },
            source: None,
        }
    }
}

// --- File representation: every field optional ---

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    server: FileServer,
    #[serde(default)]
    assets: FileAssets,
    #[serde(default)]
    responder: FileResponder,
    #[serde(default)]
    site: FileSite,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileServer {
    host: Option<String>,
    port: Option<u16>,
    workers: Option<usize>,
    backend: Option<ServerKind>,
    enable_cors: Option<bool>,
    max_message_chars: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileAssets {
    intents: Option<String>,
    template: Option<String>,
    static_dir: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileResponder {
    fallback_tag: Option<String>,
    threshold: Option<f32>,
    selection: Option<ResponseSelection>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileSite {
    institution: Option<String>,
    full_name: Option<String>,
    tagline: Option<String>,
}

/// # Load Settings (`load_settings`)
///
/// Locates the configuration file, merges it with the defaults and the
/// command-line arguments, and validates the result.
///
/// ## Errors
///
/// Returns an error if an explicitly requested config file does not exist,
/// if a config file cannot be read or parsed, or if the merged values are
/// invalid (see `Settings::validate`).
pub fn load_settings(args: &ConfigArgs, listen: Option<&ListenArgs>) -> Result<Settings> {
    let config_path = locate_config_file(args.config.as_deref())?;
    build_settings(config_path.as_deref(), args, listen)
}

/// # Build Settings (`build_settings`)
///
/// Merges defaults, the given config file (if any) and the arguments.
///
/// ## Arguments
///
/// * `config_path` - Already located config file, or `None` for defaults only.
/// * `args` - Asset and responder overrides shared by every subcommand.
/// * `listen` - Listener overrides. Only `serve` passes these.
///
/// ## Returns
///
/// * `Result<Settings>` - The validated settings. Precedence is arguments,
///   then file, then defaults.
pub fn build_settings(
    config_path: Option<&Path>,
    args: &ConfigArgs,
    listen: Option<&ListenArgs>,
) -> Result<Settings> {
    let mut settings = Settings::default();
    // Defaults point at the bundled assets wherever they are found.
    settings.assets = AssetPaths::under(&locate_asset_root());

    // Layer the file over the defaults. Relative paths in the file are
    // resolved against the file's own directory.
    if let Some(path) = config_path {
        let file_config = load_config_file(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        settings.apply_file(file_config, base_dir)?;
        settings.source = Some(path.to_path_buf());
        info!("Loaded settings from {}", path.display());
    } else {
        debug!("No configuration file found, using defaults and arguments.");
    }

    // Arguments win over everything else.
    settings.apply_args(args);
    if let Some(listen) = listen {
        settings.apply_listen(listen);
    }
    settings.validate()?;

    debug!("Effective settings: {:?}", settings);
    Ok(settings)
}

/// Finds the configuration file to use.
///
/// An explicit path must exist. Without one, `chatbot.toml` in the current
/// directory is used, then the per-user config directory. `Ok(None)` when no
/// file is found.
fn locate_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    // 1. `--config` (or CHATBOT_CONFIG) must point at a real file.
    if let Some(path) = explicit {
        let path = expand_path(path);
        if !path.is_file() {
            return Err(anyhow!(ChatbotError::Config(format!(
                "Configuration file '{}' does not exist",
                path.display()
            ))));
        }
        return Ok(Some(path));
    }

    // 2. `chatbot.toml` next to where the command runs.
    let local = std::env::current_dir()
        .context("Failed to get current working directory")?
        .join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(Some(local));
    }

    // 3. The per-user config directory.
    if let Some(proj_dirs) = ProjectDirs::from("in", "NSAKCET", "nsakcet-chatbot") {
        let user_config = proj_dirs.config_dir().join(CONFIG_FILE_NAME);
        if user_config.is_file() {
            return Ok(Some(user_config));
        }
        debug!("No user configuration at {}", user_config.display());
    }

    Ok(None)
}

/// # Locate Asset Root (`locate_asset_root`)
///
/// Finds the directory the default asset paths are resolved against, so the
/// binary works from the workspace root or from an install location and not
/// only from the package directory.
///
/// ## Returns
///
/// * `PathBuf`: the first of the current directory, the executable's
///   directory and the package directory (fixed at build time) that contains
///   `assets/intents.json`. An empty path when none does, which leaves the
///   defaults relative to the current directory so startup reports them as
///   missing.
pub fn locate_asset_root() -> PathBuf {
    let mut candidates = Vec::new();
    // 1. Current working directory.
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }
    // 2. Directory of the running executable.
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir);
    }
    // 3. The package directory the binary was built from.
    candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    for candidate in candidates {
        if candidate.join(ASSET_MARKER).is_file() {
            debug!("Using bundled assets under {}", candidate.display());
            return candidate;
        }
    }
    debug!("No bundled assets found; default asset paths stay relative.");
    PathBuf::new()
}

fn load_config_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Expands a leading `~` to the home directory.
fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Expands `~`, then resolves a relative path against `base_dir`.
fn resolve_against(base_dir: &Path, raw: &str) -> PathBuf {
    let expanded = expand_path(Path::new(raw));
    if expanded.is_relative() {
        base_dir.join(expanded)
    } else {
        expanded
    }
}

impl Settings {
    /// Overlays the values present in `file`. Absent keys keep the current value.
    ///
    /// ## Arguments
    ///
    /// * `file` - The parsed config file.
    /// * `base_dir` - Directory of the config file, for relative asset paths.
    ///
    /// ## Returns
    ///
    /// * `Result<()>` - An error only when `host` is not an IP address.
    fn apply_file(&mut self, file: FileConfig, base_dir: &Path) -> Result<()> {
        // [server]
        let server = file.server;
        if let Some(host) = server.host {
            self.server.host = host.parse().map_err(|e| {
                anyhow!(ChatbotError::Config(format!(
                    "Invalid host '{}' in config file: {}",
                    host, e
                )))
            })?;
        }
        if let Some(port) = server.port {
            self.server.port = port;
        }
        if server.workers.is_some() {
            self.server.workers = server.workers;
        }
        if let Some(backend) = server.backend {
            self.server.backend = backend;
        }
        if let Some(enable_cors) = server.enable_cors {
            self.server.enable_cors = enable_cors;
        }
        if let Some(max) = server.max_message_chars {
            self.server.max_message_chars = max;
        }

        // [assets]
        if let Some(intents) = file.assets.intents {
            self.assets.intents = resolve_against(base_dir, &intents);
        }
        if let Some(template) = file.assets.template {
            self.assets.template = resolve_against(base_dir, &template);
        }
        if let Some(static_dir) = file.assets.static_dir {
            self.assets.static_dir = resolve_against(base_dir, &static_dir);
        }

        // [responder]
        let responder = file.responder;
        if let Some(tag) = responder.fallback_tag {
            self.responder.fallback_tag = tag;
        }
        if let Some(threshold) = responder.threshold {
            self.responder.threshold = threshold;
        }
        if let Some(selection) = responder.selection {
            self.responder.selection = selection;
        }

        // [site]
        let site = file.site;
        if let Some(institution) = site.institution {
            self.site.institution = institution;
        }
        if let Some(full_name) = site.full_name {
            self.site.full_name = full_name;
        }
        if let Some(tagline) = site.tagline {
            self.site.tagline = tagline;
        }
        Ok(())
    }

    /// Command-line paths are taken relative to the current directory.
    fn apply_args(&mut self, args: &ConfigArgs) {
        if let Some(intents) = &args.intents {
            self.assets.intents = expand_path(intents);
        }
        if let Some(template) = &args.template {
            self.assets.template = expand_path(template);
        }
        if let Some(static_dir) = &args.static_dir {
            self.assets.static_dir = expand_path(static_dir);
        }
        if let Some(threshold) = args.threshold {
            self.responder.threshold = threshold;
        }
        if let Some(selection) = args.selection {
            self.responder.selection = selection;
        }
    }

    fn apply_listen(&mut self, listen: &ListenArgs) {
        if let Some(host) = listen.host {
            self.server.host = host;
        }
        if let Some(port) = listen.port {
            self.server.port = port;
        }
        if listen.workers.is_some() {
            self.server.workers = listen.workers;
        }
        if let Some(backend) = listen.server {
            self.server.backend = backend;
        }
        // A flag can only switch CORS on.
        if listen.cors {
            self.server.enable_cors = true;
        }
    }

    /// # Validate Settings (`validate`)
    ///
    /// ## Errors
    ///
    /// - `threshold` outside `0.0..=1.0`
    /// - `workers` set to zero
    /// - `max_message_chars` set to zero
    /// - blank fallback tag or institution name
    pub fn validate(&self) -> Result<()> {
        let threshold = self.responder.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(anyhow!(ChatbotError::Config(format!(
                "threshold must be between 0.0 and 1.0, got {}",
                threshold
            ))));
        }
        if self.server.workers == Some(0) {
            return Err(anyhow!(ChatbotError::Config(
                "workers must be at least 1".to_string()
            )));
        }
        if self.server.max_message_chars == 0 {
            return Err(anyhow!(ChatbotError::Config(
                "max_message_chars must be at least 1".to_string()
            )));
        }
        if self.responder.fallback_tag.trim().is_empty() {
            return Err(anyhow!(ChatbotError::Config(
                "fallback_tag must not be empty".to_string()
            )));
        }
        if self.site.institution.trim().is_empty() {
            return Err(anyhow!(ChatbotError::Config(
                "institution must not be empty".to_string()
            )));
        }
        Ok(())
    }
}
