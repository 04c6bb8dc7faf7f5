//! Human-readable phrasing of guess outcomes.

use strictly_mastermind_rules::GuessOutcome;

/// Shown when the guess broke the code.
pub const WINNING_MSG: &str = "YOU WON!!";

/// Shown when the guess limit was already reached.
pub const GAME_OVER_MSG: &str = "GAME OVER";

/// Shown when the game was won by an earlier guess.
pub const ALREADY_WON_MSG: &str = "ALREADY WON";

/// Formats an outcome, e.g. `"1 black, 2 whites"`.
pub fn outcome_message(outcome: &GuessOutcome) -> String {
    match outcome {
        GuessOutcome::AlreadyWon => ALREADY_WON_MSG.to_string(),
        GuessOutcome::GameOver => GAME_OVER_MSG.to_string(),
        GuessOutcome::Won => WINNING_MSG.to_string(),
        GuessOutcome::Scored {
            exact_matches,
            color_matches,
        } => pegs_message(*exact_matches, *color_matches),
    }
}

/// `"{n} black{s}, {m} white{s}"`, pluralized only above one.
pub fn pegs_message(black: usize, white: usize) -> String {
    format!(
        "{} black{}, {} white{}",
        black,
        plural(black),
        white,
        plural(white)
    )
}

fn plural(count: usize) -> &'static str {
    if count > 1 { "s" } else { "" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pegs_message_pluralization() {
        assert_eq!(pegs_message(1, 2), "1 black, 2 whites");
        assert_eq!(pegs_message(2, 2), "2 blacks, 2 whites");
        assert_eq!(pegs_message(0, 1), "0 black, 1 white");
    }

    #[test]
    fn test_terminal_messages() {
        assert_eq!(outcome_message(&GuessOutcome::Won), "YOU WON!!");
        assert_eq!(outcome_message(&GuessOutcome::GameOver), "GAME OVER");
        assert_eq!(outcome_message(&GuessOutcome::AlreadyWon), "ALREADY WON");
    }
}
