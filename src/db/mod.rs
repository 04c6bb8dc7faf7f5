//! SQLite persistence for games and their guess logs.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{DbError, DbErrorKind};
pub use models::{GameRow, GuessRow, NewGameRow, NewGuessRow};
pub use repository::{GameRepository, MIGRATIONS};
