//! A fixed-size cell set for the duel board.
//!
//! The whole `BOARD_SIZE × BOARD_SIZE` board is packed into a single `u128`,
//! one bit per cell in row-major order, so masks are `Copy` and combine with
//! plain bitwise operators.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign, Not};

use crate::config::BOARD_SIZE;
use crate::coord::Coord;

const BOARD_BITS: usize = BOARD_SIZE * BOARD_SIZE;

const _: () = assert!(BOARD_BITS <= u128::BITS as usize);

/// A set of board cells.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellMask {
    bits: u128,
}

impl CellMask {
    #[inline]
    fn board_mask() -> u128 {
        if BOARD_BITS == u128::BITS as usize {
            !0
        } else {
            (1u128 << BOARD_BITS) - 1
        }
    }

    /// An empty mask.
    #[inline]
    pub const fn new() -> Self {
        CellMask { bits: 0 }
    }

    /// Every cell of the board.
    pub fn full() -> Self {
        CellMask {
            bits: Self::board_mask(),
        }
    }

    /// Number of cells in the set.
    pub fn count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns `false` for coordinates off the board.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.in_bounds() && (self.bits >> coord.index()) & 1 == 1
    }

    /// Adds `coord`; returns `false` if it was off the board.
    pub fn insert(&mut self, coord: Coord) -> bool {
        if !coord.in_bounds() {
            return false;
        }
        self.bits |= 1u128 << coord.index();
        true
    }

    /// Iterate over the cells in row-major order.
    pub fn iter(&self) -> Cells {
        Cells {
            bits: self.bits,
            idx: 0,
        }
    }
}

impl FromIterator<Coord> for CellMask {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        let mut mask = CellMask::new();
        for coord in iter {
            mask.insert(coord);
        }
        mask
    }
}

/// Iterator over the cells of a [`CellMask`].
#[derive(Clone, Copy)]
pub struct Cells {
    bits: u128,
    idx: usize,
}

impl Iterator for Cells {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        while self.idx < BOARD_BITS {
            let idx = self.idx;
            self.idx += 1;
            if (self.bits >> idx) & 1 == 1 {
                return Coord::from_index(idx);
            }
        }
        None
    }
}

impl BitAnd for CellMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        CellMask {
            bits: self.bits & rhs.bits,
        }
    }
}

impl BitOr for CellMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        CellMask {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for CellMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

/// Complement within the board.
impl Not for CellMask {
    type Output = Self;
    fn not(self) -> Self {
        CellMask {
            bits: !self.bits & Self::board_mask(),
        }
    }
}

impl fmt::Debug for CellMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CellMask({} cells):", self.count())?;
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                let bit = if (self.bits >> (r * BOARD_SIZE + c)) & 1 == 1 {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
