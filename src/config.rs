//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_mastermind_rules::{MAX_GUESSES, NUM_SECRET_PEGS, Rules};
use tracing::{debug, info, instrument};

/// Environment variable overriding the database location.
pub const DATABASE_URL_ENV: &str = "MASTERMIND_DATABASE_URL";

/// Configuration for the game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Path to the SQLite database file.
    #[serde(default = "default_database_url")]
    database_url: String,

    /// Pegs per secret code for new games.
    #[serde(default = "default_code_length")]
    code_length: usize,

    /// Scored guesses allowed per new game.
    #[serde(default = "default_max_guesses")]
    max_guesses: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "strictly_mastermind.db".to_string()
}

fn default_code_length() -> usize {
    NUM_SECRET_PEGS
}

fn default_max_guesses() -> usize {
    MAX_GUESSES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            code_length: default_code_length(),
            max_guesses: default_max_guesses(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or holds
    /// invalid rules.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from `path` if given, otherwise defaults; then applies the
    /// database environment override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be loaded.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            info!(env = DATABASE_URL_ENV, "Database location taken from environment");
            config.database_url = url;
        }
        Ok(config)
    }

    /// Overrides the bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Overrides the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the database location.
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }

    /// Rules for newly created games.
    pub fn rules(&self) -> Rules {
        Rules::new(self.code_length, self.max_guesses)
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.code_length == 0 {
            return Err(ConfigError::new("code_length must be at least 1".to_string()));
        }
        if self.max_guesses == 0 {
            return Err(ConfigError::new("max_guesses must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
