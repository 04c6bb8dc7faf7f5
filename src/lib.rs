//! Strictly Mastermind library - codebreaking game server
//!
//! Wraps the pure game logic of `strictly_mastermind_rules` with storage,
//! a REST API and a terminal front end.
//!
//! # Architecture
//!
//! - **Store**: load/append access to sessions (SQLite or in-memory)
//! - **Service**: per-game serialization of guess submissions
//! - **Server**: axum REST API
//! - **Play**: terminal game loop
//!
//! # Example
//!
//! ```no_run
//! use strictly_mastermind::{GameService, InMemorySessionStore, router};
//! use strictly_mastermind_rules::{RandomColors, Rules};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let service = GameService::new(
//!     InMemorySessionStore::new(),
//!     Rules::default(),
//!     Box::new(RandomColors::from_os_rng()),
//! );
//! let app = router(Arc::new(service));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod play;
mod presentation;
mod server;
mod service;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, DATABASE_URL_ENV, ServerConfig};

// Crate-level exports - Database
pub use db::{DbError, DbErrorKind, GameRepository, GameRow, GuessRow, MIGRATIONS, NewGameRow, NewGuessRow};

// Crate-level exports - Storage
pub use store::{GameId, InMemorySessionStore, SessionStore, StoreError};

// Crate-level exports - Service
pub use service::{GameService, GameSummary, ServiceError};

// Crate-level exports - HTTP API
pub use server::{
    ApiError, CreateGameResponse, GameListResponse, GuessRequest, GuessResponse, GuessView,
    SharedService, router,
};

// Crate-level exports - Presentation
pub use presentation::{ALREADY_WON_MSG, GAME_OVER_MSG, WINNING_MSG, outcome_message, pegs_message};

// Crate-level exports - Terminal game
pub use play::{PlayError, play};
