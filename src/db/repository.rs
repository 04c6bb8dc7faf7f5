//! SQLite-backed session store.

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use strictly_mastermind_rules::{ScoredGuess, Session};
use tracing::{debug, info, instrument, warn};

use crate::db::models::to_column;
use crate::db::{DbError, DbErrorKind, GameRow, GuessRow, NewGameRow, NewGuessRow, schema};
use crate::store::{GameId, SessionStore, StoreError};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for games and guesses.
///
/// Opens a fresh connection per operation, so a repository can be shared
/// across threads freely.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(DbErrorKind::Connection, "Database path is empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Applies any pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn migrate(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, e.to_string()))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Establishes a database connection with foreign keys enforced.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })?;
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        diesel::sql_query("PRAGMA busy_timeout = 5000").execute(&mut conn)?;
        Ok(conn)
    }

    /// Loads the raw game row, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_game(&self, id: GameId) -> Result<Option<GameRow>, DbError> {
        let mut conn = self.connection()?;
        let game = schema::games::table
            .find(id)
            .select(GameRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(game)
    }

    /// Loads the raw guess rows of a game in turn order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, game), fields(game_id = game.id()))]
    pub fn guess_rows(&self, game: &GameRow) -> Result<Vec<GuessRow>, DbError> {
        let mut conn = self.connection()?;
        let rows = GuessRow::belonging_to(game)
            .select(GuessRow::as_select())
            .order(schema::guesses::turn.asc())
            .load(&mut conn)?;
        debug!(count = rows.len(), "Guess rows loaded");
        Ok(rows)
    }
}

impl SessionStore for GameRepository {
    #[instrument(skip(self, session))]
    fn create(&self, session: &Session) -> Result<GameId, StoreError> {
        let mut conn = self.connection()?;
        let rules = session.rules();
        let new_game = NewGameRow::new(
            session.secret().to_string(),
            to_column(rules.code_length(), "code_length")?,
            to_column(rules.max_guesses(), "max_guesses")?,
            session.is_won(),
        );

        let id = diesel::insert_into(schema::games::table)
            .values(&new_game)
            .returning(schema::games::id)
            .get_result::<GameId>(&mut conn)
            .map_err(DbError::from)?;

        info!(game_id = id, "Game created");
        Ok(id)
    }

    #[instrument(skip(self))]
    fn load(&self, id: GameId) -> Result<Session, StoreError> {
        let game = self.find_game(id)?.ok_or_else(|| {
            debug!(game_id = id, "Game not found");
            StoreError::SessionNotFound { id }
        })?;

        let guesses = self
            .guess_rows(&game)?
            .iter()
            .map(GuessRow::to_scored_guess)
            .collect::<Result<Vec<_>, _>>()?;

        Session::restore(game.rules()?, game.secret()?, guesses, *game.won())
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
        let mut conn = self.connection()?;
        let row = NewGuessRow::from_scored_guess(id, turn, guess)?;

        let outcome = conn.immediate_transaction(|conn| {
            diesel::insert_into(schema::guesses::table)
                .values(&row)
                .execute(conn)?;
            if won {
                diesel::update(schema::games::table.find(id))
                    .set(schema::games::won.eq(true))
                    .execute(conn)?;
            }
            Ok::<_, DieselError>(())
        });

        match outcome {
            Ok(()) => {
                debug!(game_id = id, turn, won, "Guess appended");
                Ok(())
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                warn!(game_id = id, turn, "Turn already stored");
                Err(StoreError::DuplicateTurn { id, turn })
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                Err(StoreError::SessionNotFound { id })
            }
            Err(e) => Err(DbError::from(e).into()),
        }
    }

    #[instrument(skip(self))]
    fn list_game_ids(&self) -> Result<Vec<GameId>, StoreError> {
        let mut conn = self.connection()?;
        let ids = schema::games::table
            .select(schema::games::id)
            .order(schema::games::id.asc())
            .load::<GameId>(&mut conn)
            .map_err(DbError::from)?;
        info!(count = ids.len(), "Games listed");
        Ok(ids)
    }
}
