//! In-process session store.

use super::{GameId, SessionStore, StoreError};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use strictly_mastermind_rules::{Code, Rules, ScoredGuess, Session};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
struct StoredGame {
    rules: Rules,
    secret: Code,
    guesses: Vec<ScoredGuess>,
    won: bool,
}

#[derive(Debug)]
struct MemoryState {
    next_id: GameId,
    games: BTreeMap<GameId, StoredGame>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            next_id: 1,
            games: BTreeMap::new(),
        }
    }
}

/// Keeps sessions in a shared map. Cloning shares the same map.
///
/// Used by the terminal game and by tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory session store");
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state.lock().map_err(|_| {
            warn!("In-memory store lock poisoned");
            StoreError::Poisoned
        })
    }
}

impl SessionStore for InMemorySessionStore {
    #[instrument(skip(self, session))]
    fn create(&self, session: &Session) -> Result<GameId, StoreError> {
        let mut state = self.state()?;
        let id = state.next_id;
        state.next_id += 1;
        state.games.insert(
            id,
            StoredGame {
                rules: session.rules(),
                secret: session.secret().clone(),
                guesses: session.guesses().to_vec(),
                won: session.is_won(),
            },
        );
        info!(game_id = id, "Game stored");
        Ok(id)
    }

    #[instrument(skip(self))]
    fn load(&self, id: GameId) -> Result<Session, StoreError> {
        let state = self.state()?;
        let game = state.games.get(&id).ok_or_else(|| {
            debug!(game_id = id, "Game not found");
            StoreError::SessionNotFound { id }
        })?;

        Session::restore(
            game.rules,
            game.secret.clone(),
            game.guesses.clone(),
            game.won,
        )
        .map_err(|source| StoreError::Corrupt { id, source })
    }

    #[instrument(skip(self, guess))]
    fn append_guess(
        &self,
        id: GameId,
        turn: usize,
        guess: &ScoredGuess,
        won: bool,
    ) -> Result<(), StoreError> {
        let mut state = self.state()?;
        let game = state
            .games
            .get_mut(&id)
            .ok_or(StoreError::SessionNotFound { id })?;

        if turn != game.guesses.len() + 1 {
            warn!(game_id = id, turn, stored = game.guesses.len(), "Out-of-order append");
            return Err(StoreError::DuplicateTurn { id, turn });
        }

        game.guesses.push(guess.clone());
        game.won |= won;
        debug!(game_id = id, turn, won = game.won, "Guess appended");
        Ok(())
    }

    #[instrument(skip(self))]
    fn list_game_ids(&self) -> Result<Vec<GameId>, StoreError> {
        let ids: Vec<GameId> = self.state()?.games.keys().copied().collect();
        debug!(count = ids.len(), "Listed games");
        Ok(ids)
    }
}
