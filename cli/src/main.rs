//! # NSAKCET Chatbot Entry Point
//!
//! File: cli/src/main.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! Parses the command line, sets up logging from the verbosity flags and
//! dispatches to the subcommand handlers. `main` is synchronous: the `serve`
//! command builds whichever Tokio runtime its hosting backend needs.
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! nsakcet-chatbot --help
//!
//! # Serve with request logging
//! nsakcet-chatbot -v serve --port 8080
//!
//! # Verify a deployment
//! nsakcet-chatbot check --config /etc/nsakcet/chatbot.toml
//! ```
//!
use clap::{Parser, Subcommand};
use nsakcet_chatbot::commands;
use tracing_subscriber::{fmt, EnvFilter};

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "nsakcet-chatbot",
    about = "🎓 NSAKCET chatbot: answers questions about the college",
    long_about = "Rule-based FAQ chatbot for Nawab Shah Alam Khan College of Engineering and Technology.\n\
                  Serves a web chat page and JSON API, or chats in the terminal.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web service.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Check that required files exist and the catalog and page are valid.
    Check(commands::check::CheckArgs),
    /// Chat with the bot in the terminal.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(args),
        Commands::Check(args) => commands::check::handle_check(args),
        Commands::Chat(args) => commands::chat::handle_chat(args),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
