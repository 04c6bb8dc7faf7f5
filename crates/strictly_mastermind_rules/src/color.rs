//! The fixed peg palette.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, FromRepr};

/// Color of a single peg.
///
/// The ordinal (`as u8`) is part of the external contract: clients may submit
/// either the name or the ordinal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[repr(u8)]
pub enum Color {
    /// White peg.
    White = 0,
    /// Yellow peg.
    Yellow = 1,
    /// Orange peg.
    Orange = 2,
    /// Red peg.
    Red = 3,
    /// Green peg.
    Green = 4,
    /// Blue peg.
    Blue = 5,
    /// Brown peg.
    Brown = 6,
    /// Black peg.
    Black = 7,
}

impl Color {
    /// Every color in ordinal order.
    pub const ALL: [Color; Color::COUNT] = [
        Color::White,
        Color::Yellow,
        Color::Orange,
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Brown,
        Color::Black,
    ];

    /// Returns the ordinal of this color (0-7).
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}
