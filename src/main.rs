//! Strictly Mastermind - Unified CLI
//!
//! Runs the REST game server or a single terminal game.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use strictly_mastermind::{
    GameRepository, GameService, InMemorySessionStore, ServerConfig, play, router,
};
use strictly_mastermind_rules::{ColorSource, RandomColors};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.command);
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve {
            port,
            host,
            database,
        } => {
            let mut config = config;
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(database) = database {
                config = config.with_database_url(database);
            }
            run_http_server(config).await
        }
        Command::Play { seed } => run_terminal_game(config, seed),
    }
}

/// Install the subscriber before anything logs; `RUST_LOG` wins over the
/// command's default filter.
fn init_tracing(command: &Command) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(command.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the HTTP game server
#[instrument(skip(config), fields(bind = %config.bind_address()))]
async fn run_http_server(config: ServerConfig) -> Result<()> {
    info!("Starting Strictly Mastermind server");

    let repository = GameRepository::new(config.database_url().clone())?;
    repository
        .migrate()
        .with_context(|| format!("Migrating database '{}'", config.database_url()))?;

    let service = GameService::new(
        repository,
        config.rules(),
        Box::new(RandomColors::from_os_rng()),
    );
    let app = router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Binding {}", config.bind_address()))?;
    info!(address = %config.bind_address(), "Server ready - listening for HTTP requests");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Play one game on stdin/stdout
fn run_terminal_game(config: ServerConfig, seed: Option<u64>) -> Result<()> {
    let colors: Box<dyn ColorSource + Send> = match seed {
        Some(seed) => Box::new(RandomColors::seeded(seed)),
        None => Box::new(RandomColors::from_os_rng()),
    };
    let service = GameService::new(InMemorySessionStore::new(), config.rules(), colors);

    let stdin = std::io::stdin();
    play(&service, stdin.lock(), std::io::stdout())?;
    Ok(())
}
