//! # Serve Command
//!
//! File: cli/src/commands/serve.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! `nsakcet-chatbot serve` loads the configuration, validates the catalog,
//! renders the page and starts the chosen hosting backend. Any failure before
//! the socket is bound is returned as an error, which `main` turns into exit
//! code 1.
//!
//! ## Examples
//!
//! ```bash
//! # Production backend on 0.0.0.0:5000
//! nsakcet-chatbot serve
//!
//! # Local development with port fallback
//! nsakcet-chatbot serve --server dev --port 8000
//!
//! # Four worker threads, custom catalog
//! nsakcet-chatbot serve --workers 4 --intents /srv/chatbot/intents.json
//! ```
//!
use crate::core::config::{self, ConfigArgs, ListenArgs};
use crate::core::error::Result;
use crate::server;
use clap::Parser;
use tracing::info;

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub listen: ListenArgs,
}

/// # Handle Serve Command (`handle_serve`)
///
/// Blocks until the server shuts down.
pub fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command...");
    let settings = config::load_settings(&args.config, Some(&args.listen))?;
    server::run(&settings)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ServerKind;

    #[test]
    fn test_serve_args_parsing() {
        let args = ServeArgs::try_parse_from([
            "serve", "--server", "dev", "--port", "8000", "--workers", "2", "--cors",
            "--threshold", "0.4",
        ])
        .unwrap();
        assert_eq!(args.listen.server, Some(ServerKind::Dev));
        assert_eq!(args.listen.port, Some(8000));
        assert_eq!(args.listen.workers, Some(2));
        assert!(args.listen.cors);
        assert_eq!(args.config.threshold, Some(0.4));
    }

    #[test]
    fn test_serve_args_reject_unknown_backend() {
        assert!(ServeArgs::try_parse_from(["serve", "--server", "gunicorn"]).is_err());
    }

    #[test]
    fn test_serve_fails_before_binding_on_missing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = ServeArgs {
            config: ConfigArgs {
                intents: Some(dir.path().join("intents.json")),
                template: Some(dir.path().join("index.html")),
                static_dir: Some(dir.path().join("static")),
                ..ConfigArgs::default()
            },
            ..ServeArgs::default()
        };
        let err = handle_serve(args).unwrap_err();
        assert!(err.to_string().contains("Required files are missing"));
    }
}
