//! Game service: store + state machine + per-game serialization.

use crate::store::{GameId, SessionStore, StoreError};
use derive_more::{Display, Error};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use strictly_mastermind_rules::{
    Code, ColorSource, EvaluateError, GameStatus, GuessOutcome, InvalidGuessFormat, Rules,
    ScoredGuess, Session, parse_guess,
};
use tracing::{debug, error, info, instrument, warn};

/// Errors from the game service.
#[derive(Debug, Display, Error)]
pub enum ServiceError {
    /// Storage failed, including unknown game ids.
    #[display("{_0}")]
    Store(#[error(source)] StoreError),

    /// The guess does not fit the game's code length.
    #[display("{_0}")]
    Evaluate(#[error(source)] EvaluateError),

    /// The raw guess is not a well-formed code.
    #[display("{_0}")]
    InvalidGuess(#[error(source)] InvalidGuessFormat),

    /// A per-game lock was poisoned.
    #[display("Lock for game {id} poisoned")]
    LockPoisoned {
        /// Game id.
        id: GameId,
    },

    /// The secret generator lock was poisoned.
    #[display("Color source lock poisoned")]
    ColorSourcePoisoned,
}

impl ServiceError {
    /// Whether the requested game does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<InvalidGuessFormat> for ServiceError {
    fn from(err: InvalidGuessFormat) -> Self {
        Self::InvalidGuess(err)
    }
}

impl From<EvaluateError> for ServiceError {
    fn from(err: EvaluateError) -> Self {
        Self::Evaluate(err)
    }
}

/// Read-only view of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    /// Game id.
    pub game_id: GameId,
    /// Current status.
    pub status: GameStatus,
    /// Scored guesses so far.
    pub guess_count: usize,
    /// Scored guesses still permitted.
    pub guesses_remaining: usize,
    /// Guess limit for this game.
    pub max_guesses: usize,
    /// Pegs per code for this game.
    pub code_length: usize,
}

impl GameSummary {
    fn of(game_id: GameId, session: &Session) -> Self {
        Self {
            game_id,
            status: session.status(),
            guess_count: session.guess_count(),
            guesses_remaining: session.guesses_remaining(),
            max_guesses: session.rules().max_guesses(),
            code_length: session.rules().code_length(),
        }
    }
}

/// One lock per game id.
#[derive(Debug, Default)]
struct GameLocks {
    locks: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl GameLocks {
    fn for_game(&self, id: GameId) -> Result<Arc<Mutex<()>>, ServiceError> {
        let mut locks = self.locks.lock().map_err(|_| ServiceError::LockPoisoned { id })?;
        Ok(Arc::clone(locks.entry(id).or_default()))
    }

    /// Drops the entry for `id` once no caller holds it.
    fn release(&self, id: GameId, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.locks.lock() else {
            error!(game_id = id, "Lock map poisoned, entry not released");
            return;
        };
        drop(lock);
        if locks
            .get(&id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(&id);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }
}

/// Creates games and routes guesses through the session state machine.
///
/// Submissions for the same game are serialized so that the
/// load → check → append sequence never interleaves. Different games do not
/// contend beyond a brief lookup of their lock.
pub struct GameService<S> {
    store: S,
    rules: Rules,
    colors: Mutex<Box<dyn ColorSource + Send>>,
    locks: GameLocks,
}

impl<S: SessionStore> GameService<S> {
    /// Creates a service that generates new secrets from `colors`.
    #[instrument(skip(store, colors))]
    pub fn new(store: S, rules: Rules, colors: Box<dyn ColorSource + Send>) -> Self {
        info!(
            code_length = rules.code_length(),
            max_guesses = rules.max_guesses(),
            "Creating game service"
        );
        Self {
            store,
            rules,
            colors: Mutex::new(colors),
            locks: GameLocks::default(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rules applied to new games.
    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Starts a new game with a generated secret.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails.
    #[instrument(skip(self))]
    pub fn new_game(&self) -> Result<GameId, ServiceError> {
        let session = {
            let mut colors = self
                .colors
                .lock()
                .map_err(|_| ServiceError::ColorSourcePoisoned)?;
            Session::generate(self.rules, &mut **colors)
        };
        let id = self.store.create(&session)?;
        info!(game_id = id, "New game started");
        Ok(id)
    }

    /// Submits a guess for a game.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the game does not exist, the guess length
    /// does not match, or the store fails.
    #[instrument(skip(self, guess), fields(guess = %guess))]
    pub fn submit_guess(&self, id: GameId, guess: Code) -> Result<GuessOutcome, ServiceError> {
        self.submit_locked(id, |_| Ok(guess))
    }

    /// Validates raw color tokens against the game's code length, then
    /// submits them.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidGuess`] for malformed tokens, otherwise
    /// as [`GameService::submit_guess`].
    #[instrument(skip(self, tokens), fields(count = tokens.len()))]
    pub fn submit_tokens<T: AsRef<str>>(
        &self,
        id: GameId,
        tokens: &[T],
    ) -> Result<GuessOutcome, ServiceError> {
        self.submit_locked(id, |session| {
            Ok(parse_guess(tokens, session.rules().code_length())?)
        })
    }

    /// Runs load → validate → decide → append while holding the game's lock.
    fn submit_locked(
        &self,
        id: GameId,
        make_guess: impl FnOnce(&Session) -> Result<Code, ServiceError>,
    ) -> Result<GuessOutcome, ServiceError> {
        let lock = self.locks.for_game(id)?;
        let result = lock
            .lock()
            .map_err(|_| ServiceError::LockPoisoned { id })
            .and_then(|_guard| self.submit_guarded(id, make_guess));
        self.locks.release(id, lock);
        result
    }

    /// The body of [`GameService::submit_locked`]; the caller holds the lock.
    fn submit_guarded(
        &self,
        id: GameId,
        make_guess: impl FnOnce(&Session) -> Result<Code, ServiceError>,
    ) -> Result<GuessOutcome, ServiceError> {
        let mut session = self.store.load(id)?;
        let guess = make_guess(&session)?;
        let outcome = session.submit_guess(guess)?;

        if outcome.is_recorded() {
            let Some(scored) = session.last_guess() else {
                error!(game_id = id, "Recorded outcome without a logged guess");
                return Ok(outcome);
            };
            self.store
                .append_guess(id, session.guess_count(), scored, session.is_won())?;
            debug!(game_id = id, turn = session.guess_count(), "Guess persisted");
        } else {
            warn!(game_id = id, ?outcome, "Guess rejected by game state");
        }

        Ok(outcome)
    }

    /// The scored guesses of a game in order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the game does not exist or the store fails.
    #[instrument(skip(self))]
    pub fn guesses(&self, id: GameId) -> Result<Vec<ScoredGuess>, ServiceError> {
        let session = self.store.load(id)?;
        Ok(session.guesses().to_vec())
    }

    /// Ids of every stored game in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<GameId>, ServiceError> {
        Ok(self.store.list_game_ids()?)
    }

    /// Summary of a game.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the game does not exist or the store fails.
    #[instrument(skip(self))]
    pub fn summary(&self, id: GameId) -> Result<GameSummary, ServiceError> {
        let session = self.store.load(id)?;
        Ok(GameSummary::of(id, &session))
    }
}
