use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four pads of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

/// Fixed palette, in board order.
pub const PALETTE: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }

    /// Uniform pick over the palette, with replacement.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen()
    }
}

impl Distribution<Color> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        PALETTE[rng.gen_range(0..PALETTE.len())]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color '{}': expected red, blue, green or yellow", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PALETTE
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::Red);
        assert_eq!("YELLOW".parse::<Color>().unwrap(), Color::Yellow);
        assert_eq!(" Green ".parse::<Color>().unwrap(), Color::Green);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            "purple".parse::<Color>(),
            Err(UnknownColor("purple".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Color::Blue).unwrap(), "\"blue\"");
        let c: Color = serde_json::from_str("\"yellow\"").unwrap();
        assert_eq!(c, Color::Yellow);
    }

    #[test]
    fn test_random_covers_palette_and_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        let picks: Vec<Color> = (0..400).map(|_| Color::random(&mut rng)).collect();

        let distinct: HashSet<Color> = picks.iter().copied().collect();
        assert_eq!(distinct.len(), PALETTE.len());

        // With replacement: immediate repeats must show up over 400 draws
        assert!(picks.windows(2).any(|w| w[0] == w[1]));
    }
}
