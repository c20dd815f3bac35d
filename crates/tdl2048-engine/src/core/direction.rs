use serde::{Deserialize, Serialize};

/// Direction in which all tiles slide.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in evaluation order.
    ///
    /// Agents iterate in this order and keep the first best move, so the
    /// order decides ties and must stay fixed for reproducible runs.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns `true` for directions that move tiles along columns.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Returns `true` for directions that move tiles toward index 0 of a line.
    #[must_use]
    pub const fn is_toward_start(self) -> bool {
        matches!(self, Self::Up | Self::Left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_orientation() {
        assert!(Direction::Up.is_vertical() && Direction::Up.is_toward_start());
        assert!(Direction::Down.is_vertical() && !Direction::Down.is_toward_start());
        assert!(!Direction::Left.is_vertical() && Direction::Left.is_toward_start());
        assert!(!Direction::Right.is_vertical() && !Direction::Right.is_toward_start());
    }

    #[test]
    fn test_from_str_accepts_lowercase() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("Right".parse::<Direction>().unwrap(), Direction::Right);
        assert!("diagonal".parse::<Direction>().is_err());
    }
}
