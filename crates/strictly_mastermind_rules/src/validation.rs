//! Guess validation.
//!
//! Raw guesses arrive as lists of tokens (color names or ordinals). These
//! functions turn them into a [`Code`] or reject them before they reach the
//! evaluator or the session state machine.

use crate::{Code, Color};
use derive_more::{Display, Error};
use std::str::FromStr;
use tracing::{debug, instrument, warn};

/// A guess that is not a well-formed code for the game.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum InvalidGuessFormat {
    /// The guess has the wrong number of pegs.
    #[display("Guess must have exactly {expected} pegs, got {actual}")]
    WrongLength {
        /// Pegs required by the game rules.
        expected: usize,
        /// Pegs supplied.
        actual: usize,
    },

    /// A token is neither a palette color name nor a valid ordinal.
    #[display("Unknown color '{value}'")]
    UnknownColor {
        /// The offending token.
        value: String,
    },

    /// No pegs at all.
    #[display("Guess is empty")]
    Empty,
}

/// Parses a single color token: a name (any case) or an ordinal `0..=7`.
///
/// # Errors
///
/// Returns [`InvalidGuessFormat::UnknownColor`] if the token names no color.
pub fn parse_color(token: &str) -> Result<Color, InvalidGuessFormat> {
    let token = token.trim();

    if let Ok(ordinal) = token.parse::<u8>() {
        return Color::from_repr(ordinal).ok_or_else(|| InvalidGuessFormat::UnknownColor {
            value: token.to_string(),
        });
    }

    Color::from_str(token).map_err(|_| InvalidGuessFormat::UnknownColor {
        value: token.to_string(),
    })
}

/// Parses a full guess and checks its length against `expected_len`.
///
/// # Errors
///
/// Returns [`InvalidGuessFormat`] on a wrong peg count or an unknown color.
#[instrument(skip(tokens), fields(count = tokens.len()))]
pub fn parse_guess<S: AsRef<str>>(
    tokens: &[S],
    expected_len: usize,
) -> Result<Code, InvalidGuessFormat> {
    if tokens.len() != expected_len {
        warn!(expected = expected_len, actual = tokens.len(), "Guess has wrong length");
        return Err(InvalidGuessFormat::WrongLength {
            expected: expected_len,
            actual: tokens.len(),
        });
    }

    let pegs = tokens
        .iter()
        .map(|token| parse_color(token.as_ref()))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| warn!(error = %e, "Guess contains an unknown color"))?;

    debug!(?pegs, "Guess parsed");
    Ok(Code::new(pegs))
}

/// Splits a typed guess on commas and/or whitespace.
pub fn guess_tokens(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Parses a guess typed as one line, separated by commas and/or whitespace.
///
/// # Errors
///
/// Returns [`InvalidGuessFormat`] on an empty line, a wrong peg count or an
/// unknown color.
pub fn parse_guess_line(line: &str, expected_len: usize) -> Result<Code, InvalidGuessFormat> {
    let tokens = guess_tokens(line);

    if tokens.is_empty() {
        return Err(InvalidGuessFormat::Empty);
    }
    parse_guess(tokens.as_slice(), expected_len)
}
