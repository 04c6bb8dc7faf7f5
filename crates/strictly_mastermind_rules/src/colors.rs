//! Secret-code generation strategies.
//!
//! A [`ColorSource`] is asked for one color per position. The server injects a
//! random source; tests inject fixed sequences or closures.

use crate::{Code, Color};
use tracing::{debug, instrument};

/// Supplies the color of each peg when generating a secret code.
pub trait ColorSource {
    /// Returns the color for the peg at `position`.
    fn color_at(&mut self, position: usize) -> Color;
}

/// Any `FnMut(usize) -> Color` is a color source.
impl<F> ColorSource for F
where
    F: FnMut(usize) -> Color,
{
    fn color_at(&mut self, position: usize) -> Color {
        self(position)
    }
}

/// Generates a code of `length` pegs from `source`.
#[instrument(skip(source))]
pub fn generate_code<C: ColorSource + ?Sized>(source: &mut C, length: usize) -> Code {
    let pegs: Vec<Color> = (0..length).map(|position| source.color_at(position)).collect();
    debug!(length, "Secret code generated");
    Code::new(pegs)
}

/// Always yields the same color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantColor(pub Color);

impl ColorSource for ConstantColor {
    fn color_at(&mut self, _position: usize) -> Color {
        self.0
    }
}

/// Yields colors from a fixed sequence, cycling when it runs out.
///
/// Successive codes generated from the same source continue where the
/// previous one stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedColors {
    colors: Vec<Color>,
    cursor: usize,
}

impl FixedColors {
    /// Creates a source over `colors`. An empty list yields [`Color::White`].
    pub fn new(colors: impl Into<Vec<Color>>) -> Self {
        Self {
            colors: colors.into(),
            cursor: 0,
        }
    }
}

impl ColorSource for FixedColors {
    fn color_at(&mut self, _position: usize) -> Color {
        if self.colors.is_empty() {
            return Color::White;
        }
        let color = self.colors[self.cursor % self.colors.len()];
        self.cursor += 1;
        color
    }
}

/// Uniformly random colors.
#[cfg(feature = "random")]
#[derive(Debug, Clone)]
pub struct RandomColors {
    rng: rand::rngs::StdRng,
}

#[cfg(feature = "random")]
impl RandomColors {
    /// Creates a source seeded from the operating system.
    pub fn from_os_rng() -> Self {
        use rand::SeedableRng;
        Self {
            rng: rand::rngs::StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible source from `seed`.
    pub fn seeded(seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }
}

#[cfg(feature = "random")]
impl ColorSource for RandomColors {
    fn color_at(&mut self, _position: usize) -> Color {
        use rand::Rng;
        Color::ALL[self.rng.random_range(0..Color::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_colors_cycle() {
        let mut source = FixedColors::new(vec![Color::Red, Color::Blue]);
        let code = generate_code(&mut source, 3);
        assert_eq!(code.pegs(), &[Color::Red, Color::Blue, Color::Red]);
        let next = generate_code(&mut source, 1);
        assert_eq!(next.pegs(), &[Color::Blue]);
    }

    #[test]
    fn test_closure_source_sees_positions() {
        let mut by_position = |position: usize| Color::ALL[position];
        let code = generate_code(&mut by_position, 4);
        assert_eq!(
            code.pegs(),
            &[Color::White, Color::Yellow, Color::Orange, Color::Red]
        );
    }

    #[test]
    fn test_constant_color() {
        let code = generate_code(&mut ConstantColor(Color::Brown), 4);
        assert!(code.iter().all(|peg| *peg == Color::Brown));
    }

    #[cfg(feature = "random")]
    #[test]
    fn test_seeded_random_is_reproducible() {
        let first = generate_code(&mut RandomColors::seeded(42), 6);
        let second = generate_code(&mut RandomColors::seeded(42), 6);
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
    }
}
