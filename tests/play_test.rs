//! Tests for the terminal game loop.

use std::io::Cursor;

use strictly_mastermind::{GameService, InMemorySessionStore, play};
use strictly_mastermind_rules::{Color, FixedColors, GuessOutcome, Rules};

fn service(rules: Rules) -> GameService<InMemorySessionStore> {
    GameService::new(
        InMemorySessionStore::new(),
        rules,
        Box::new(FixedColors::new(vec![
            Color::Red,
            Color::Blue,
            Color::Green,
            Color::Red,
        ])),
    )
}

fn run(rules: Rules, input: &str) -> (Option<GuessOutcome>, String) {
    let service = service(rules);
    let mut output = Vec::new();
    let last = play(&service, Cursor::new(input), &mut output).expect("Play failed");
    (last, String::from_utf8(output).expect("UTF-8 output"))
}

#[test]
fn test_play_until_won() {
    let (last, output) = run(
        Rules::default(),
        "red blue red green\n\nred,blue,green,red\nwhite white white white\n",
    );

    assert_eq!(last, Some(GuessOutcome::Won));
    assert!(output.contains("2 blacks, 2 whites"), "{output}");
    assert!(output.contains("YOU WON!!"), "{output}");
    // Input after the win is never read as a guess.
    assert_eq!(output.matches("] ").count(), 2, "{output}");
}

#[test]
fn test_invalid_lines_are_reported_and_skipped() {
    let (last, output) = run(Rules::default(), "red blue\npink red red red\n3 5 4 3\n");

    assert_eq!(last, Some(GuessOutcome::Won));
    assert!(output.contains("Guess must have exactly 4 pegs, got 2"), "{output}");
    assert!(output.contains("Unknown color 'pink'"), "{output}");
    assert!(output.contains("[1/11] YOU WON!!"), "{output}");
}

#[test]
fn test_exhausted_game_reveals_code() {
    let (last, output) = run(Rules::new(4, 2), "white white white white\nblack black black black\n");

    assert_eq!(
        last,
        Some(GuessOutcome::Scored {
            exact_matches: 0,
            color_matches: 0
        })
    );
    assert!(output.contains("The code was RED,BLUE,GREEN,RED"), "{output}");
}

#[test]
fn test_no_input_means_no_outcome() {
    let (last, output) = run(Rules::default(), "");
    assert_eq!(last, None);
    assert!(output.starts_with("New game #1"), "{output}");
}
