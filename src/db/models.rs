//! Database rows and their conversion to game types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use strictly_mastermind_rules::{Code, GuessResult, Rules, ScoredGuess};
use tracing::instrument;

use crate::db::{DbError, schema};

/// A stored game: secret, rules and the won flag.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRow {
    id: i32,
    secret_code: String,
    code_length: i32,
    max_guesses: i32,
    won: bool,
    created_at: NaiveDateTime,
}

impl GameRow {
    /// Parses the stored secret.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column does not hold a valid code.
    #[instrument(skip(self), fields(game_id = self.id))]
    pub fn secret(&self) -> Result<Code, DbError> {
        self.secret_code
            .parse::<Code>()
            .map_err(|e| DbError::corrupt(format!("Game {} secret: {}", self.id, e)))
    }

    /// The rules stored with this game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a stored count is negative.
    #[instrument(skip(self), fields(game_id = self.id))]
    pub fn rules(&self) -> Result<Rules, DbError> {
        Ok(Rules::new(
            to_count(self.code_length, "code_length")?,
            to_count(self.max_guesses, "max_guesses")?,
        ))
    }
}

/// Insertable game row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGameRow {
    secret_code: String,
    code_length: i32,
    max_guesses: i32,
    won: bool,
}

/// A stored scored guess.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::guesses)]
#[diesel(belongs_to(GameRow, foreign_key = game_id))]
pub struct GuessRow {
    id: i32,
    game_id: i32,
    turn: i32,
    code_guess: String,
    exact_matches: i32,
    color_matches: i32,
    created_at: NaiveDateTime,
}

impl GuessRow {
    /// Converts the row back into a scored guess.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the code or the counts are invalid.
    #[instrument(skip(self), fields(game_id = self.game_id, turn = self.turn))]
    pub fn to_scored_guess(&self) -> Result<ScoredGuess, DbError> {
        let code = self.code_guess.parse::<Code>().map_err(|e| {
            DbError::corrupt(format!("Game {} turn {}: {}", self.game_id, self.turn, e))
        })?;
        let result = GuessResult::new(
            to_count(self.exact_matches, "exact_matches")?,
            to_count(self.color_matches, "color_matches")?,
        );
        Ok(ScoredGuess::new(code, result))
    }
}

/// Insertable guess row.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::guesses)]
pub struct NewGuessRow {
    game_id: i32,
    turn: i32,
    code_guess: String,
    exact_matches: i32,
    color_matches: i32,
}

impl NewGuessRow {
    /// Builds the row for the `turn`-th guess of a game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a count does not fit the column type.
    #[instrument(skip(guess))]
    pub fn from_scored_guess(game_id: i32, turn: usize, guess: &ScoredGuess) -> Result<Self, DbError> {
        Ok(Self::new(
            game_id,
            to_column(turn, "turn")?,
            guess.code().to_string(),
            to_column(guess.result().exact_matches(), "exact_matches")?,
            to_column(guess.result().color_matches(), "color_matches")?,
        ))
    }
}

/// Converts a count to an INTEGER column value.
#[track_caller]
pub(crate) fn to_column(value: usize, column: &str) -> Result<i32, DbError> {
    i32::try_from(value).map_err(|_| DbError::corrupt(format!("{column} {value} out of range")))
}

#[track_caller]
fn to_count(value: i32, column: &str) -> Result<usize, DbError> {
    usize::try_from(value).map_err(|_| DbError::corrupt(format!("Negative {column}: {value}")))
}
