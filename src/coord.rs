//! Board coordinates and their textual form (`B2`, `J10`).
//!
//! Rows are labelled with letters starting at `A`, columns with numbers
//! starting at `1`. Only coordinates inside the `BOARD_SIZE × BOARD_SIZE`
//! board can be constructed through the checked constructors.

use core::fmt;
use core::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::BOARD_SIZE;

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    row: u8,
    col: u8,
}

/// Errors produced while parsing or building a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordError {
    #[error("'{0}' is not a coordinate (expected a row letter and a column number, e.g. B2)")]
    Malformed(String),
    #[error("{row}{col} is outside the board")]
    OutOfBounds { row: char, col: usize },
}

impl Coord {
    /// Build a coordinate from zero-based indices.
    pub fn new(row: usize, col: usize) -> Result<Self, CoordError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(CoordError::OutOfBounds {
                row: row_label(row),
                col: col + 1,
            });
        }
        Ok(Self {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Build a coordinate without a bounds check. Used for values that are
    /// validated later, e.g. raw client input.
    pub const fn unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn col(&self) -> usize {
        self.col as usize
    }

    pub fn in_bounds(&self) -> bool {
        self.row() < BOARD_SIZE && self.col() < BOARD_SIZE
    }

    /// Position of the cell in row-major order.
    pub fn index(&self) -> usize {
        self.row() * BOARD_SIZE + self.col()
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        if idx >= BOARD_SIZE * BOARD_SIZE {
            return None;
        }
        Some(Self::unchecked(
            (idx / BOARD_SIZE) as u8,
            (idx % BOARD_SIZE) as u8,
        ))
    }

    /// A coordinate drawn uniformly from the whole board.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::unchecked(
            rng.random_range(0..BOARD_SIZE) as u8,
            rng.random_range(0..BOARD_SIZE) as u8,
        )
    }

    /// Orthogonal neighbours that lie on the board.
    pub fn neighbours(&self) -> impl Iterator<Item = Coord> + '_ {
        const STEPS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        STEPS.iter().filter_map(move |(dr, dc)| {
            let r = self.row() as isize + dr;
            let c = self.col() as isize + dc;
            if r < 0 || c < 0 {
                return None;
            }
            Coord::new(r as usize, c as usize).ok()
        })
    }

    /// Iterate over every cell of the board in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE * BOARD_SIZE).filter_map(Coord::from_index)
    }
}

fn row_label(row: usize) -> char {
    b'A'.wrapping_add(row as u8) as char
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", row_label(self.row()), self.col() + 1)
    }
}

impl FromStr for Coord {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let row_ch = chars
            .next()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or_else(|| CoordError::Malformed(trimmed.to_string()))?
            .to_ascii_uppercase();
        let digits = chars.as_str();
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(CoordError::Malformed(trimmed.to_string()));
        }
        let col: usize = digits
            .parse()
            .map_err(|_| CoordError::Malformed(trimmed.to_string()))?;
        let row = (row_ch as u8 - b'A') as usize;
        Coord::new(row, col - 1)
    }
}

/// Parse a `;`-separated coordinate list such as `B2;B3;C2`.
pub fn parse_list(input: &str) -> Result<Vec<Coord>, CoordError> {
    input
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

/// Render coordinates the way `parse_list` reads them.
pub fn format_list(cells: &[Coord]) -> String {
    cells
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(";")
}
