//! Cube model and state-transition engine
//!
//! This module provides everything the search needs to know about the puzzle:
//! - `state`: the `Cube` value type with twisting, child generation and the solved test
//! - `pool`: a bounded free list of cubes so the hot search loop does not allocate
//! - `text`: the plain-text cube file format
//! - `error`: error types for loading and validating cubes

pub mod error;
pub mod pool;
pub mod state;
pub mod text;

pub use error::{CubeError, FormatError};
pub use pool::StatePool;
pub use state::Cube;
pub use text::{load_cube_file, load_cube_str, to_text};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of faces on a cube.
pub const FACES: usize = 6;

/// Faces of the cube, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Top = 0,
    Left = 1,
    Front = 2,
    Right = 3,
    Back = 4,
    Bottom = 5,
}

impl Face {
    pub const ALL: [Face; FACES] = [
        Face::Top,
        Face::Left,
        Face::Front,
        Face::Right,
        Face::Back,
        Face::Bottom,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Facelet colors. A solved cube has `Face::ALL[i]` painted `Color::ALL[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White = 0,
    Blue = 1,
    Orange = 2,
    Green = 3,
    Red = 4,
    Yellow = 5,
}

impl Color {
    pub const ALL: [Color; FACES] = [
        Color::White,
        Color::Blue,
        Color::Orange,
        Color::Green,
        Color::Red,
        Color::Yellow,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-letter code used by the text format.
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'B',
            Color::Orange => 'O',
            Color::Green => 'G',
            Color::Red => 'R',
            Color::Yellow => 'Y',
        }
    }

    pub fn from_letter(letter: char) -> Option<Color> {
        match letter {
            'W' => Some(Color::White),
            'B' => Some(Color::Blue),
            'O' => Some(Color::Orange),
            'G' => Some(Color::Green),
            'R' => Some(Color::Red),
            'Y' => Some(Color::Yellow),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Rotation axis of a twist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Turning direction of a twist. Four twists in the same direction are the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Positive, Direction::Negative];

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_letters() {
        for color in Color::ALL {
            assert_eq!(Color::from_letter(color.letter()), Some(color));
        }
        assert_eq!(Color::from_letter('X'), None);
        assert_eq!(Color::from_letter('w'), None);
    }

    #[test]
    fn test_direction_reversed() {
        assert_eq!(Direction::Positive.reversed(), Direction::Negative);
        assert_eq!(Direction::Negative.reversed(), Direction::Positive);
    }
}
