//! Tests for the game service: turn limits, win priority and per-game
//! serialization.

use std::sync::Arc;
use std::thread;

use tempfile::NamedTempFile;

use strictly_mastermind::{GameRepository, GameService, InMemorySessionStore, SessionStore};
use strictly_mastermind_rules::{
    Code, Color, FixedColors, GameStatus, GuessOutcome, MAX_GUESSES, Rules,
};
use Color::*;

const SECRET: [Color; 4] = [Red, Blue, Green, Red];
const MISS: [Color; 4] = [White, White, White, White];

fn memory_service() -> GameService<InMemorySessionStore> {
    GameService::new(
        InMemorySessionStore::new(),
        Rules::default(),
        Box::new(FixedColors::new(SECRET.to_vec())),
    )
}

fn sqlite_service() -> (NamedTempFile, GameService<GameRepository>) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.migrate().expect("Migrations failed");
    let service = GameService::new(
        repo,
        Rules::default(),
        Box::new(FixedColors::new(SECRET.to_vec())),
    );
    (db_file, service)
}

#[test]
fn test_scored_guess_is_persisted() {
    let service = memory_service();
    let id = service.new_game().expect("New game failed");

    let outcome = service
        .submit_guess(id, Code::from([Red, Blue, Red, Green]))
        .expect("Submit failed");
    assert_eq!(
        outcome,
        GuessOutcome::Scored {
            exact_matches: 2,
            color_matches: 2
        }
    );

    let guesses = service.guesses(id).expect("Guesses failed");
    assert_eq!(guesses.len(), 1);
    assert_eq!(guesses[0].result().exact_matches(), 2);
}

#[test]
fn test_limit_boundary_on_sqlite() {
    let (_db, service) = sqlite_service();
    let id = service.new_game().expect("New game failed");

    for turn in 1..=MAX_GUESSES {
        let outcome = service
            .submit_guess(id, Code::from(MISS))
            .expect("Submit failed");
        assert!(
            matches!(outcome, GuessOutcome::Scored { .. }),
            "turn {turn} should be scored"
        );
    }

    let summary = service.summary(id).expect("Summary failed");
    assert_eq!(summary.guess_count, MAX_GUESSES);
    assert_eq!(summary.status, GameStatus::Exhausted);

    let outcome = service
        .submit_guess(id, Code::from(SECRET))
        .expect("Submit failed");
    assert_eq!(outcome, GuessOutcome::GameOver);
    assert_eq!(service.guesses(id).expect("Guesses failed").len(), MAX_GUESSES);
}

#[test]
fn test_won_game_rejects_further_guesses_on_sqlite() {
    let (_db, service) = sqlite_service();
    let id = service.new_game().expect("New game failed");

    assert_eq!(
        service.submit_guess(id, Code::from(SECRET)).expect("Submit failed"),
        GuessOutcome::Won
    );
    assert_eq!(
        service.submit_guess(id, Code::from(SECRET)).expect("Submit failed"),
        GuessOutcome::AlreadyWon
    );

    let summary = service.summary(id).expect("Summary failed");
    assert_eq!(summary.status, GameStatus::Won);
    assert_eq!(summary.guess_count, 1);
    assert_eq!(summary.guesses_remaining, 0);
}

#[test]
fn test_games_are_independent() {
    let service = memory_service();
    let first = service.new_game().expect("New game failed");
    let second = service.new_game().expect("New game failed");

    service
        .submit_guess(first, Code::from(SECRET))
        .expect("Submit failed");

    let outcome = service
        .submit_guess(second, Code::from(MISS))
        .expect("Submit failed");
    assert!(matches!(outcome, GuessOutcome::Scored { .. }));
    assert_eq!(
        service.summary(second).expect("Summary failed").status,
        GameStatus::InProgress
    );
}

#[test]
fn test_concurrent_submissions_never_exceed_limit() {
    let service = Arc::new(memory_service());
    let id = service.new_game().expect("New game failed");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                (0..MAX_GUESSES)
                    .map(|_| service.submit_guess(id, Code::from(MISS)).expect("Submit failed"))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let outcomes: Vec<GuessOutcome> = handles
        .into_iter()
        .flat_map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    let scored = outcomes.iter().filter(|o| o.is_recorded()).count();
    let rejected = outcomes
        .iter()
        .filter(|o| **o == GuessOutcome::GameOver)
        .count();
    assert_eq!(scored, MAX_GUESSES);
    assert_eq!(rejected, 3 * MAX_GUESSES);
    assert_eq!(service.store().load(id).expect("Load failed").guess_count(), MAX_GUESSES);
}

#[test]
fn test_concurrent_winning_guesses_score_once() {
    let service = Arc::new(memory_service());
    let id = service.new_game().expect("New game failed");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.submit_guess(id, Code::from(SECRET)).expect("Submit failed"))
        })
        .collect();

    let outcomes: Vec<GuessOutcome> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    assert_eq!(outcomes.iter().filter(|o| **o == GuessOutcome::Won).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| **o == GuessOutcome::AlreadyWon)
            .count(),
        7
    );
    assert_eq!(service.guesses(id).expect("Guesses failed").len(), 1);
}

#[test]
fn test_secrets_come_from_injected_source() {
    let service = GameService::new(
        InMemorySessionStore::new(),
        Rules::new(3, 5),
        Box::new(|position: usize| Color::ALL[position + 4]),
    );
    let id = service.new_game().expect("New game failed");
    let session = service.store().load(id).expect("Load failed");
    assert_eq!(session.secret(), &Code::from([Green, Blue, Brown]));
    assert_eq!(session.rules().max_guesses(), 5);
}
