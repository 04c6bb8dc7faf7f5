//! The per-game state machine.
//!
//! A [`Session`] owns the secret and the append-only guess log. Every
//! submission passes three gates in order:
//!
//! 1. already won → [`GuessOutcome::AlreadyWon`]
//! 2. guess limit reached → [`GuessOutcome::GameOver`]
//! 3. score it, log it, and report [`GuessOutcome::Won`] or
//!    [`GuessOutcome::Scored`]
//!
//! Rejected submissions leave the session untouched.

use crate::colors::{ColorSource, generate_code};
use crate::evaluator::{EvaluateError, GuessResult, evaluate};
use crate::Code;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Pegs in a code under the default rules.
pub const NUM_SECRET_PEGS: usize = 4;

/// Scored guesses allowed per game under the default rules.
pub const MAX_GUESSES: usize = 11;

/// Parameters fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rules {
    code_length: usize,
    max_guesses: usize,
}

impl Rules {
    /// Creates rules with the given code length and guess limit.
    pub fn new(code_length: usize, max_guesses: usize) -> Self {
        Self {
            code_length,
            max_guesses,
        }
    }

    /// Pegs per code.
    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Scored guesses permitted before the game is over.
    pub fn max_guesses(&self) -> usize {
        self.max_guesses
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new(NUM_SECRET_PEGS, MAX_GUESSES)
    }
}

/// A guess together with its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ScoredGuess {
    /// The submitted code.
    code: Code,
    /// Its score against the secret.
    result: GuessResult,
}

impl ScoredGuess {
    /// Pairs a guess with its score.
    pub fn new(code: Code, result: GuessResult) -> Self {
        Self { code, result }
    }
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Guesses are still accepted.
    #[display("in progress")]
    InProgress,
    /// The code was broken.
    #[display("won")]
    Won,
    /// No guesses remain and the code was not broken.
    #[display("exhausted")]
    Exhausted,
}

impl GameStatus {
    /// Whether no further guesses will be scored.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Response to a single guess submission.
///
/// `AlreadyWon` and `GameOver` are regular game flow, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuessOutcome {
    /// The game was already won; the guess was not scored.
    AlreadyWon,
    /// The guess limit was already reached; the guess was not scored.
    GameOver,
    /// This guess broke the code. It is recorded in the log.
    Won,
    /// The guess was scored and recorded; the game continues or is now exhausted.
    Scored {
        /// Black pegs.
        exact_matches: usize,
        /// White pegs.
        color_matches: usize,
    },
}

impl GuessOutcome {
    /// Whether the guess was appended to the log.
    pub fn is_recorded(self) -> bool {
        matches!(self, Self::Won | Self::Scored { .. })
    }
}

/// Inconsistent session data.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// The secret does not have the length the rules require.
    #[display("Secret has {actual} pegs, rules require {expected}")]
    SecretLength {
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A logged guess does not have the length the rules require.
    #[display("Guess #{turn} has {actual} pegs, rules require {expected}")]
    GuessLength {
        /// One-based position in the log.
        turn: usize,
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// The log holds more guesses than the rules permit.
    #[display("Log holds {count} guesses, limit is {limit}")]
    GuessLimitExceeded {
        /// Guesses in the log.
        count: usize,
        /// Permitted guesses.
        limit: usize,
    },

    /// A logged result claims more pegs than the code has.
    #[display("Guess #{turn} scored {exact_matches}+{color_matches} pegs on a {code_length}-peg code")]
    ImpossibleResult {
        /// One-based position in the log.
        turn: usize,
        /// Logged black pegs.
        exact_matches: usize,
        /// Logged white pegs.
        color_matches: usize,
        /// Pegs per code.
        code_length: usize,
    },

    /// The log continues after a winning guess.
    #[display("Guess #{turn} was scored after the game was won on guess #{won_on}")]
    GuessAfterWin {
        /// One-based position of the offending guess.
        turn: usize,
        /// One-based position of the winning guess.
        won_on: usize,
    },
}

/// One game: a secret code plus its guess history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    rules: Rules,
    secret: Code,
    guesses: Vec<ScoredGuess>,
    won: bool,
}

impl Session {
    /// Starts a game with the given secret.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SecretLength`] if the secret does not match the
    /// rules.
    #[instrument(skip(secret), fields(secret_len = secret.len()))]
    pub fn new(rules: Rules, secret: Code) -> Result<Self, SessionError> {
        if secret.len() != rules.code_length() {
            return Err(SessionError::SecretLength {
                expected: rules.code_length(),
                actual: secret.len(),
            });
        }

        info!("New session started");
        Ok(Self {
            rules,
            secret,
            guesses: Vec::new(),
            won: false,
        })
    }

    /// Starts a game with a secret drawn from `source`.
    #[instrument(skip(source))]
    pub fn generate<C: ColorSource + ?Sized>(rules: Rules, source: &mut C) -> Self {
        let secret = generate_code(source, rules.code_length());
        info!("New session started");
        Self {
            rules,
            secret,
            guesses: Vec::new(),
            won: false,
        }
    }

    /// Rebuilds a session from stored state.
    ///
    /// The session counts as won if the stored flag is set or if any logged
    /// guess is a perfect score.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the secret or a logged guess has the wrong
    /// length, or the log is longer than the guess limit.
    #[instrument(skip(secret, guesses), fields(count = guesses.len()))]
    pub fn restore(
        rules: Rules,
        secret: Code,
        guesses: Vec<ScoredGuess>,
        won: bool,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(rules, secret)?;

        if guesses.len() > rules.max_guesses() {
            return Err(SessionError::GuessLimitExceeded {
                count: guesses.len(),
                limit: rules.max_guesses(),
            });
        }

        let mut won_on = None;
        for (i, guess) in guesses.iter().enumerate() {
            let turn = i + 1;
            if guess.code().len() != rules.code_length() {
                return Err(SessionError::GuessLength {
                    turn,
                    expected: rules.code_length(),
                    actual: guess.code().len(),
                });
            }

            let result = guess.result();
            if result.exact_matches() + result.color_matches() > rules.code_length() {
                return Err(SessionError::ImpossibleResult {
                    turn,
                    exact_matches: result.exact_matches(),
                    color_matches: result.color_matches(),
                    code_length: rules.code_length(),
                });
            }

            if let Some(won_on) = won_on {
                return Err(SessionError::GuessAfterWin { turn, won_on });
            }
            if result.is_solved(rules.code_length()) {
                won_on = Some(turn);
            }
        }

        let solved_in_log = won_on.is_some();
        if solved_in_log && !won {
            warn!("Stored won flag is unset but the log contains a winning guess");
        }

        session.won = won || solved_in_log;
        session.guesses = guesses;
        debug!(won = session.won, "Session restored");
        Ok(session)
    }

    /// Submits a guess.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluateError::LengthMismatch`] if the guess length differs
    /// from the secret. The session is unchanged in that case.
    #[instrument(skip(self, guess), fields(guess = %guess, turn = self.guesses.len() + 1))]
    pub fn submit_guess(&mut self, guess: Code) -> Result<GuessOutcome, EvaluateError> {
        if self.won {
            warn!("Guess submitted after the game was won");
            return Ok(GuessOutcome::AlreadyWon);
        }

        if self.guesses.len() >= self.rules.max_guesses() {
            warn!(limit = self.rules.max_guesses(), "Guess submitted after the limit");
            return Ok(GuessOutcome::GameOver);
        }

        let result = evaluate(&self.secret, &guess)?;
        self.guesses.push(ScoredGuess::new(guess, result));

        if result.is_solved(self.secret.len()) {
            self.won = true;
            info!(guesses = self.guesses.len(), "Code broken");
            return Ok(GuessOutcome::Won);
        }

        info!(
            exact_matches = result.exact_matches(),
            color_matches = result.color_matches(),
            remaining = self.guesses_remaining(),
            "Guess scored"
        );
        Ok(GuessOutcome::Scored {
            exact_matches: result.exact_matches(),
            color_matches: result.color_matches(),
        })
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        if self.won {
            GameStatus::Won
        } else if self.guesses.len() >= self.rules.max_guesses() {
            GameStatus::Exhausted
        } else {
            GameStatus::InProgress
        }
    }

    /// The rules this session was created with.
    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// The secret code.
    pub fn secret(&self) -> &Code {
        &self.secret
    }

    /// Scored guesses in submission order.
    pub fn guesses(&self) -> &[ScoredGuess] {
        &self.guesses
    }

    /// The most recently scored guess.
    pub fn last_guess(&self) -> Option<&ScoredGuess> {
        self.guesses.last()
    }

    /// Number of scored guesses.
    pub fn guess_count(&self) -> usize {
        self.guesses.len()
    }

    /// Scored guesses still permitted (zero once won).
    pub fn guesses_remaining(&self) -> usize {
        if self.won {
            0
        } else {
            self.rules.max_guesses().saturating_sub(self.guesses.len())
        }
    }

    /// Whether the code has been broken.
    pub fn is_won(&self) -> bool {
        self.won
    }
}
