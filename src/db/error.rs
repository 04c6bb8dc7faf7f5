//! Database error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// What part of the database layer failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DbErrorKind {
    /// Opening the SQLite file failed.
    #[display("connection")]
    Connection,
    /// Applying embedded migrations failed.
    #[display("migration")]
    Migration,
    /// A query or transaction failed.
    #[display("query")]
    Query,
    /// A stored row could not be turned back into game state.
    #[display("corrupt row")]
    Corrupt,
}

/// Database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database {} error: {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure category.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// A stored row that does not describe a valid game.
    #[track_caller]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::new(DbErrorKind::Corrupt, message)
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(DbErrorKind::Query, format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(DbErrorKind::Connection, format!("Connection error: {}", err))
    }
}
