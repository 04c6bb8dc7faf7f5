//! Pure Mastermind game logic.
//!
//! This crate holds everything about the game that does not depend on
//! storage or transport:
//!
//! - **Evaluator**: scores a guess against the secret (black and white pegs)
//! - **Session**: the per-game state machine (already won, guess limit, win)
//! - **Colors**: secret-code generation strategies
//! - **Validation**: turning raw tokens into a well-formed [`Code`]
//!
//! # Example
//!
//! ```
//! use strictly_mastermind_rules::{Code, Color, GuessOutcome, Rules, Session};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let secret = Code::new(vec![Color::Red, Color::Blue, Color::Green, Color::Red]);
//! let mut session = Session::new(Rules::default(), secret)?;
//!
//! let guess = Code::new(vec![Color::Red, Color::Blue, Color::Red, Color::Green]);
//! let outcome = session.submit_guess(guess)?;
//! assert_eq!(outcome, GuessOutcome::Scored { exact_matches: 2, color_matches: 2 });
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod code;
mod color;
mod colors;
mod evaluator;
mod session;
mod validation;

pub use code::Code;
pub use color::Color;
pub use colors::{ColorSource, ConstantColor, FixedColors, generate_code};
#[cfg(feature = "random")]
pub use colors::RandomColors;
pub use evaluator::{EvaluateError, GuessResult, evaluate};
pub use session::{
    GameStatus, GuessOutcome, MAX_GUESSES, NUM_SECRET_PEGS, Rules, ScoredGuess, Session,
    SessionError,
};
pub use validation::{InvalidGuessFormat, guess_tokens, parse_color, parse_guess, parse_guess_line};
