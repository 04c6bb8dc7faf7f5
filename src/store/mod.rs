//! Session storage capability.
//!
//! The service loads a [`Session`] by id, lets the state machine decide, and
//! writes back only the appended guess and the won flag. Implementations must
//! apply an append and its won flag together.

mod memory;

pub use memory::InMemorySessionStore;

use crate::db::DbError;
use derive_more::{Display, Error};
use strictly_mastermind_rules::{ScoredGuess, Session, SessionError};

/// Identifier of a stored game.
pub type GameId = i32;

/// Load/append access to stored sessions.
pub trait SessionStore: Send + Sync {
    /// Stores a freshly created session and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn create(&self, session: &Session) -> Result<GameId, StoreError>;

    /// Loads a session with its full guess log.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionNotFound`] for an unknown id.
    fn load(&self, id: GameId) -> Result<Session, StoreError>;

    /// Appends the `turn`-th (one-based) scored guess and persists the won
    /// flag in the same write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateTurn`] if that turn is already stored,
    /// [`StoreError::SessionNotFound`] for an unknown id.
    fn append_guess(
        &self,
        id: GameId,
        turn: usize,
        guess: &ScoredGuess,
        won: bool,
    ) -> Result<(), StoreError>;

    /// Ids of all stored games, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn list_game_ids(&self) -> Result<Vec<GameId>, StoreError>;
}

/// Storage failures.
#[derive(Debug, Display, Error)]
pub enum StoreError {
    /// No game with this id.
    #[display("Game {id} not found")]
    SessionNotFound {
        /// Requested id.
        id: GameId,
    },

    /// A guess for this turn was already stored.
    #[display("Game {id} already has a guess for turn {turn}")]
    DuplicateTurn {
        /// Game id.
        id: GameId,
        /// One-based turn.
        turn: usize,
    },

    /// Stored state does not form a valid session.
    #[display("Game {id} is corrupt: {source}")]
    Corrupt {
        /// Game id.
        id: GameId,
        /// Why the state was rejected.
        source: SessionError,
    },

    /// The SQLite backend failed.
    #[display("{_0}")]
    Database(#[error(source)] DbError),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[display("Session store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Whether this is a missing-game error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound { .. })
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::Database(err)
    }
}
