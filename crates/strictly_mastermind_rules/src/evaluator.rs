//! Guess scoring.
//!
//! Black pegs are exact matches (right color, right position). White pegs are
//! color matches at other positions, counted one-to-one: every secret peg can
//! satisfy at most one guessed peg, and exact matches are claimed first.

use crate::{Code, Color};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Score of one guess against the secret.
///
/// `exact_matches + color_matches` never exceeds the code length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuessResult {
    exact_matches: usize,
    color_matches: usize,
}

impl GuessResult {
    /// Creates a result from raw counts.
    pub fn new(exact_matches: usize, color_matches: usize) -> Self {
        Self {
            exact_matches,
            color_matches,
        }
    }

    /// Black pegs: right color in the right position.
    pub fn exact_matches(&self) -> usize {
        self.exact_matches
    }

    /// White pegs: right color in another position.
    pub fn color_matches(&self) -> usize {
        self.color_matches
    }

    /// Whether every one of `code_length` pegs matched exactly.
    pub fn is_solved(&self, code_length: usize) -> bool {
        self.exact_matches == code_length
    }
}

/// Contract violations when scoring.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum EvaluateError {
    /// Secret and guess have different lengths.
    #[display("Secret has {secret_len} pegs but guess has {guess_len}")]
    LengthMismatch {
        /// Length of the secret.
        secret_len: usize,
        /// Length of the guess.
        guess_len: usize,
    },
}

/// Scores `guess` against `secret`.
///
/// Neither code is modified; the consumption bookkeeping happens on working
/// copies.
///
/// # Errors
///
/// Returns [`EvaluateError::LengthMismatch`] if the codes differ in length.
#[instrument(level = "debug", fields(secret_len = secret.len(), guess_len = guess.len()), skip(secret, guess), ret)]
pub fn evaluate(secret: &Code, guess: &Code) -> Result<GuessResult, EvaluateError> {
    if secret.len() != guess.len() {
        return Err(EvaluateError::LengthMismatch {
            secret_len: secret.len(),
            guess_len: guess.len(),
        });
    }

    // Exact pass: matched positions are consumed on both sides.
    let mut exact_matches = 0;
    let mut unmatched_secret: Vec<Option<Color>> = Vec::with_capacity(secret.len());
    let mut unmatched_guess: Vec<Color> = Vec::with_capacity(guess.len());
    for (secret_peg, guess_peg) in secret.iter().zip(guess.iter()) {
        if secret_peg == guess_peg {
            exact_matches += 1;
        } else {
            unmatched_secret.push(Some(*secret_peg));
            unmatched_guess.push(*guess_peg);
        }
    }

    // Color pass: each guessed peg consumes the first remaining secret peg of its color.
    let mut color_matches = 0;
    for guess_peg in unmatched_guess {
        if let Some(slot) = unmatched_secret
            .iter_mut()
            .find(|slot| **slot == Some(guess_peg))
        {
            *slot = None;
            color_matches += 1;
        }
    }

    Ok(GuessResult::new(exact_matches, color_matches))
}
