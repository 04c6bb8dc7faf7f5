//! Tests for the SQLite session store.

use tempfile::NamedTempFile;

use strictly_mastermind::{GameRepository, SessionStore, StoreError};
use strictly_mastermind_rules::{
    Code, Color, GameStatus, GuessOutcome, GuessResult, Rules, ScoredGuess, Session,
};
use Color::*;

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.migrate().expect("Migrations failed");
    (db_file, repo)
}

fn new_session() -> Session {
    Session::new(Rules::default(), Code::from([Red, Blue, Green, Red])).expect("Valid secret")
}

fn scored(pegs: [Color; 4], exact: usize, color: usize) -> ScoredGuess {
    ScoredGuess::new(Code::from(pegs), GuessResult::new(exact, color))
}

#[test]
fn test_create_and_load_game() {
    let (_db, repo) = setup_test_db();
    let id = repo.create(&new_session()).expect("Create failed");
    assert!(id > 0);

    let loaded = repo.load(id).expect("Load failed");
    assert_eq!(loaded.secret(), &Code::from([Red, Blue, Green, Red]));
    assert_eq!(loaded.rules(), Rules::default());
    assert_eq!(loaded.guess_count(), 0);
    assert_eq!(loaded.status(), GameStatus::InProgress);
}

#[test]
fn test_load_unknown_game() {
    let (_db, repo) = setup_test_db();
    let result = repo.load(404);
    assert!(matches!(result, Err(StoreError::SessionNotFound { id: 404 })));
}

#[test]
fn test_append_guesses_in_order() {
    let (_db, repo) = setup_test_db();
    let id = repo.create(&new_session()).expect("Create failed");

    repo.append_guess(id, 1, &scored([White, White, White, White], 0, 0), false)
        .expect("Append failed");
    repo.append_guess(id, 2, &scored([Red, Blue, Red, Green], 2, 2), false)
        .expect("Append failed");

    let loaded = repo.load(id).expect("Load failed");
    assert_eq!(loaded.guess_count(), 2);
    assert_eq!(loaded.guesses()[0].code(), &Code::from([White, White, White, White]));
    assert_eq!(loaded.guesses()[1].result(), &GuessResult::new(2, 2));
    assert!(!loaded.is_won());
}

#[test]
fn test_winning_append_persists_won_flag() {
    let (_db, repo) = setup_test_db();
    let id = repo.create(&new_session()).expect("Create failed");

    repo.append_guess(id, 1, &scored([Red, Blue, Green, Red], 4, 0), true)
        .expect("Append failed");

    let game = repo.find_game(id).expect("Query failed").expect("Game exists");
    assert!(*game.won());

    let mut loaded = repo.load(id).expect("Load failed");
    assert!(loaded.is_won());
    assert_eq!(
        loaded.submit_guess(Code::from([Red, Blue, Green, Red])).expect("Not an error"),
        GuessOutcome::AlreadyWon
    );
}

#[test]
fn test_duplicate_turn_is_rejected() {
    let (_db, repo) = setup_test_db();
    let id = repo.create(&new_session()).expect("Create failed");
    let guess = scored([White, White, White, White], 0, 0);

    repo.append_guess(id, 1, &guess, false).expect("Append failed");
    let again = repo.append_guess(id, 1, &guess, true);
    assert!(matches!(again, Err(StoreError::DuplicateTurn { turn: 1, .. })));

    // The rejected write must not have flipped the won flag.
    let game = repo.find_game(id).expect("Query failed").expect("Game exists");
    assert!(!*game.won());
}

#[test]
fn test_append_to_unknown_game() {
    let (_db, repo) = setup_test_db();
    let result = repo.append_guess(7, 1, &scored([Red, Red, Red, Red], 1, 0), false);
    assert!(matches!(result, Err(StoreError::SessionNotFound { id: 7 })));
}

#[test]
fn test_custom_rules_round_trip() {
    let (_db, repo) = setup_test_db();
    let session = Session::new(Rules::new(5, 3), Code::from([Black, Brown, Blue, Green, Red]))
        .expect("Valid secret");
    let id = repo.create(&session).expect("Create failed");

    let loaded = repo.load(id).expect("Load failed");
    assert_eq!(loaded.rules(), Rules::new(5, 3));
    assert_eq!(loaded.secret().len(), 5);
}

#[test]
fn test_list_game_ids() {
    let (_db, repo) = setup_test_db();
    assert!(repo.list_game_ids().expect("List failed").is_empty());

    let first = repo.create(&new_session()).expect("Create failed");
    let second = repo.create(&new_session()).expect("Create failed");
    assert_eq!(repo.list_game_ids().expect("List failed"), vec![first, second]);
}

#[test]
fn test_guess_rows_ordered_by_turn() {
    let (_db, repo) = setup_test_db();
    let id = repo.create(&new_session()).expect("Create failed");
    for turn in 1..=3 {
        repo.append_guess(id, turn, &scored([Yellow, Yellow, Yellow, Yellow], 0, 0), false)
            .expect("Append failed");
    }

    let game = repo.find_game(id).expect("Query failed").expect("Game exists");
    let turns: Vec<i32> = repo
        .guess_rows(&game)
        .expect("Query failed")
        .iter()
        .map(|row| *row.turn())
        .collect();
    assert_eq!(turns, vec![1, 2, 3]);
}

#[test]
fn test_guess_logged_after_win_loads_as_corrupt() {
    let (_db, repo) = setup_test_db();
    let id = repo.create(&new_session()).expect("Create failed");

    repo.append_guess(id, 1, &scored([Red, Blue, Green, Red], 4, 0), true)
        .expect("Append failed");
    // The store itself does not replay the state machine.
    repo.append_guess(id, 2, &scored([White, White, White, White], 0, 0), false)
        .expect("Append failed");

    let result = repo.load(id);
    assert!(
        matches!(result, Err(StoreError::Corrupt { id: corrupt_id, .. }) if corrupt_id == id),
        "{result:?}"
    );
}

#[test]
fn test_impossible_result_loads_as_corrupt() {
    let (_db, repo) = setup_test_db();
    let id = repo.create(&new_session()).expect("Create failed");

    repo.append_guess(id, 1, &scored([Red, Red, Red, Red], 4, 4), false)
        .expect("Append failed");

    assert!(matches!(repo.load(id), Err(StoreError::Corrupt { .. })));
}
