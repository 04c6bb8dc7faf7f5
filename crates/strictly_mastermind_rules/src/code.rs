//! Ordered peg sequences: secrets and guesses.

use crate::Color;
use crate::validation::{InvalidGuessFormat, parse_color};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ordered sequence of colored pegs.
///
/// Used both for the hidden secret and for submitted guesses. A code is never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code {
    pegs: Vec<Color>,
}

impl Code {
    /// Creates a code from the given pegs.
    pub fn new(pegs: Vec<Color>) -> Self {
        Self { pegs }
    }

    /// Number of pegs.
    pub fn len(&self) -> usize {
        self.pegs.len()
    }

    /// Whether the code holds no pegs.
    pub fn is_empty(&self) -> bool {
        self.pegs.is_empty()
    }

    /// The pegs in order.
    pub fn pegs(&self) -> &[Color] {
        &self.pegs
    }

    /// Iterates over the pegs in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.pegs.iter()
    }
}

impl From<Vec<Color>> for Code {
    fn from(pegs: Vec<Color>) -> Self {
        Self::new(pegs)
    }
}

impl<const N: usize> From<[Color; N]> for Code {
    fn from(pegs: [Color; N]) -> Self {
        Self::new(pegs.to_vec())
    }
}

impl<'a> IntoIterator for &'a Code {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.pegs.iter()
    }
}

/// Renders the comma-separated storage form, e.g. `RED,BLUE,GREEN,RED`.
impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, peg) in self.pegs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{peg}")?;
        }
        Ok(())
    }
}

/// Parses the comma-separated storage form. Any non-zero length is accepted;
/// length checks against the game rules belong to [`crate::parse_guess`].
impl FromStr for Code {
    type Err = InvalidGuessFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pegs = s
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(parse_color)
            .collect::<Result<Vec<_>, _>>()?;

        if pegs.is_empty() {
            return Err(InvalidGuessFormat::Empty);
        }
        Ok(Self::new(pegs))
    }
}
