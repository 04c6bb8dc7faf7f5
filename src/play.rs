//! Terminal game loop.

use crate::presentation::outcome_message;
use crate::service::{GameService, ServiceError};
use crate::store::SessionStore;
use std::io::{self, BufRead, Write};
use strictly_mastermind_rules::{Color, GuessOutcome, guess_tokens};
use tracing::{info, instrument};

/// Plays one game on `input`/`output` until it is won, exhausted, or input
/// ends.
///
/// Each line is one guess: color names or ordinals separated by commas or
/// spaces. Returns the last outcome, `None` if no guess was scored or
/// rejected by the game state.
///
/// # Errors
///
/// Returns [`PlayError`] if the store fails or terminal I/O fails. Malformed
/// guesses are reported on `output` and do not end the game.
#[instrument(skip_all)]
pub fn play<S, R, W>(
    service: &GameService<S>,
    input: R,
    mut output: W,
) -> Result<Option<GuessOutcome>, PlayError>
where
    S: SessionStore,
    R: BufRead,
    W: Write,
{
    let id = service.new_game()?;
    let rules = service.rules();
    let palette: Vec<String> = Color::ALL.iter().map(|color| color.to_string()).collect();

    writeln!(
        output,
        "New game #{}: break a {}-peg code in {} guesses.",
        id,
        rules.code_length(),
        rules.max_guesses()
    )?;
    writeln!(output, "Colors: {}", palette.join(" "))?;

    let mut last = None;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let tokens = guess_tokens(&line);
        let outcome = match service.submit_tokens(id, tokens.as_slice()) {
            Ok(outcome) => outcome,
            Err(ServiceError::InvalidGuess(e)) => {
                writeln!(output, "{}", e)?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let summary = service.summary(id)?;
        writeln!(
            output,
            "[{}/{}] {}",
            summary.guess_count,
            summary.max_guesses,
            outcome_message(&outcome)
        )?;
        last = Some(outcome);

        if summary.status.is_terminal() {
            if !matches!(outcome, GuessOutcome::Won) {
                let secret = service.store().load(id).map_err(ServiceError::from)?;
                writeln!(output, "The code was {}", secret.secret())?;
            }
            break;
        }
    }

    info!(game_id = id, outcome = ?last, "Terminal game finished");
    Ok(last)
}

/// Failure of the terminal game.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PlayError {
    /// The game service failed.
    #[display("{_0}")]
    Service(#[error(source)] ServiceError),
    /// Reading input or writing output failed.
    #[display("Terminal I/O failed: {_0}")]
    Io(#[error(source)] io::Error),
}

impl From<ServiceError> for PlayError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<io::Error> for PlayError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
