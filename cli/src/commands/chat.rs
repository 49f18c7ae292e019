//! # Chat Command
//!
//! File: cli/src/commands/chat.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! `nsakcet-chatbot chat` talks to the same responder the web service uses,
//! from the terminal. With `--message` it answers once and exits; otherwise
//! it reads lines from stdin until `bye`, `quit`, `exit` or end of input.
//!
//! ## Examples
//!
//! ```bash
//! nsakcet-chatbot chat --message "What are the fees?"
//!
//! nsakcet-chatbot chat --selection first
//! You: hello
//! Bot: Hello! Welcome to NSAKCET. How can I help you today?
//! You: bye
//! ```
//!
use crate::core::config::{self, ConfigArgs};
use crate::core::error::Result;
use crate::responder::{normalize, Responder};
use crate::server;
use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::info;

/// Inputs that end an interactive session.
const EXIT_WORDS: &[&str] = &["bye", "quit", "exit"];

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct ChatArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Answer this single message and exit.
    #[arg(long, short)]
    pub message: Option<String>,
}

/// # Handle Chat Command (`handle_chat`)
pub fn handle_chat(args: ChatArgs) -> Result<()> {
    info!("Handling chat command...");
    let settings = config::load_settings(&args.config, None)?;
    let responder = server::load_responder(&settings)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.message {
        Some(message) => {
            writeln!(out, "{}", responder.respond(&message)).context("Failed to write reply")?;
            Ok(())
        }
        None => {
            writeln!(
                out,
                "{} chatbot. Type 'bye' to leave.",
                settings.site.institution
            )
            .context("Failed to write greeting")?;
            run_session(&responder, io::stdin().lock(), &mut out)
        }
    }
}

/// Runs the prompt/answer loop over arbitrary input and output streams.
pub fn run_session<R: BufRead, W: Write>(
    responder: &Responder,
    input: R,
    output: &mut W,
) -> Result<()> {
    let mut lines = input.lines();
    loop {
        write!(output, "You: ").context("Failed to write prompt")?;
        output.flush().context("Failed to flush output")?;

        let line = match lines.next() {
            Some(line) => line.context("Failed to read input")?,
            None => {
                writeln!(output).context("Failed to write output")?;
                return Ok(());
            }
        };

        if EXIT_WORDS.contains(&normalize(&line).as_str()) {
            writeln!(output, "Bot: Goodbye!").context("Failed to write reply")?;
            return Ok(());
        }

        writeln!(output, "Bot: {}", responder.respond(&line)).context("Failed to write reply")?;
    }
}
