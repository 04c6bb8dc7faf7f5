//! Command-line interface for strictly_mastermind.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Mastermind - codebreaking game server
#[derive(Parser, Debug)]
#[command(name = "strictly_mastermind")]
#[command(about = "Mastermind game server with REST API and SQLite persistence", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Path to the database file, created if missing (overrides config)
        #[arg(long)]
        database: Option<String>,
    },

    /// Play a single game in the terminal
    Play {
        /// Seed for a reproducible secret code
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Command {
    /// Log filter used when `RUST_LOG` is unset. The terminal game shares
    /// the console with the player, so it only reports problems.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Command::Serve { .. } => "info",
            Command::Play { .. } => "warn",
        }
    }
}
