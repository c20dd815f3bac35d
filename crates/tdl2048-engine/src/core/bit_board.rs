use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

/// Number of rows (and columns) of the board.
pub const BOARD_SIZE: usize = 4;
/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;
/// Largest exponent a single nibble can hold (tile value 32768).
pub const MAX_EXPONENT: u8 = 0xF;

const NIBBLE_MASK: u64 = 0xF;
const ROW_MASK: u64 = 0xFFFF;

/// Packed 4x4 board, one 4-bit nibble per cell.
///
/// Each nibble holds the log2 exponent of the tile in that cell
/// (`0` = empty, `1` = tile 2, `2` = tile 4, ...).
///
/// # Bit Layout (LSB to MSB)
///
/// ```text
///             col 0   col 1   col 2   col 3
/// row 0:  bits  0-3    4-7    8-11   12-15
/// row 1:  bits 16-19  20-23  24-27   28-31
/// row 2:  bits 32-35  36-39  40-43   44-47
/// row 3:  bits 48-51  52-55  56-59   60-63
/// ```
///
/// Nibble index `4 * row + col` sits at bit offset `16 * row + 4 * col`, so a
/// whole row is a contiguous 16-bit value usable directly as a table index.
/// The board is a plain value type: copying it is free and there is no
/// shared state.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BitBoard {
    bits: u64,
}

impl Serialize for BitBoard {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "0000000000002011" (16 hex digits, nibble 15 first)
        let mut hex_string = String::with_capacity(CELL_COUNT);
        write!(&mut hex_string, "{:016x}", self.bits).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_string)
    }
}

impl<'de> Deserialize<'de> for BitBoard {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.len() != CELL_COUNT {
            return Err(serde::de::Error::custom(format!(
                "expected {CELL_COUNT} hex digits, got {}",
                s.len()
            )));
        }
        let bits = u64::from_str_radix(&s, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid board hex: {s} ({e})")))?;
        Ok(Self { bits })
    }
}

impl BitBoard {
    pub const EMPTY: Self = Self { bits: 0 };

    /// Wraps a raw packed board.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Returns the raw packed board.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    /// Builds a board from a grid of tile exponents, row 0 first.
    ///
    /// # Panics
    ///
    /// Panics if an exponent exceeds [`MAX_EXPONENT`].
    #[must_use]
    pub fn from_exponents(grid: [[u8; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut board = Self::EMPTY;
        for (row, cells) in grid.iter().enumerate() {
            for (col, &exponent) in cells.iter().enumerate() {
                board = board.with_tile(row, col, exponent);
            }
        }
        board
    }

    /// Builds a board from four packed rows, row 0 first.
    #[inline]
    #[must_use]
    pub const fn from_rows(rows: [u16; BOARD_SIZE]) -> Self {
        Self {
            bits: (rows[0] as u64)
                | ((rows[1] as u64) << 16)
                | ((rows[2] as u64) << 32)
                | ((rows[3] as u64) << 48),
        }
    }

    /// Returns the exponent stored at `(row, col)`.
    #[inline]
    #[must_use]
    pub const fn tile(self, row: usize, col: usize) -> u8 {
        self.nibble(row * BOARD_SIZE + col)
    }

    /// Returns the exponent stored at nibble index `index` (`4 * row + col`).
    #[inline]
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn nibble(self, index: usize) -> u8 {
        ((self.bits >> (index * 4)) & NIBBLE_MASK) as u8
    }

    /// Returns a copy of the board with `(row, col)` set to `exponent`.
    ///
    /// # Panics
    ///
    /// Panics if `exponent` exceeds [`MAX_EXPONENT`].
    #[inline]
    #[must_use]
    pub fn with_tile(self, row: usize, col: usize, exponent: u8) -> Self {
        assert!(
            exponent <= MAX_EXPONENT,
            "tile exponent {exponent} does not fit in a nibble"
        );
        let shift = (row * BOARD_SIZE + col) * 4;
        let cleared = self.bits & !(NIBBLE_MASK << shift);
        Self {
            bits: cleared | (u64::from(exponent) << shift),
        }
    }

    /// Returns row `i` (`0..4`) as a packed 16-bit value.
    ///
    /// Bits `[16 * i, 16 * i + 16)` of the board; column 0 is the low nibble.
    /// Applied to [`transpose`](Self::transpose)d boards this yields columns.
    #[inline]
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn row(self, i: usize) -> u16 {
        ((self.bits >> (i * 16)) & ROW_MASK) as u16
    }

    /// Returns all four rows, row 0 first.
    #[inline]
    #[must_use]
    pub const fn rows(self) -> [u16; BOARD_SIZE] {
        [self.row(0), self.row(1), self.row(2), self.row(3)]
    }

    /// Transposes the 4x4 nibble matrix (rows become columns).
    ///
    /// Pure bit manipulation in two passes:
    ///
    /// 1. Swap the off-diagonal nibble pairs inside each 2x2 block
    ///    (shift by 12 bits).
    /// 2. Swap the two off-diagonal 2x2 blocks (shift by 24 bits).
    ///
    /// Diagonal nibbles (0, 5, 10, 15) never move and applying the transpose
    /// twice returns the original board.
    #[inline]
    #[must_use]
    pub const fn transpose(self) -> Self {
        let x = self.bits;
        let a1 = x & 0xF0F0_0F0F_F0F0_0F0F;
        let a2 = x & 0x0000_F0F0_0000_F0F0;
        let a3 = x & 0x0F0F_0000_0F0F_0000;
        let a = a1 | (a2 << 12) | (a3 >> 12);
        let b1 = a & 0xFF00_FF00_00FF_00FF;
        let b2 = a & 0x00FF_00FF_0000_0000;
        let b3 = a & 0x0000_0000_FF00_FF00;
        Self {
            bits: b1 | (b2 >> 24) | (b3 << 24),
        }
    }

    /// Returns the nine overlapping 2x2 blocks as 16-bit keys.
    ///
    /// Blocks are ordered by their top-left cell, row-major from `(0, 0)` to
    /// `(2, 2)`. A block whose top-left cell is nibble `i` packs nibbles
    /// `i`, `i + 1`, `i + 4`, `i + 5` (top-left, top-right, bottom-left,
    /// bottom-right) into key bits 0, 4, 8 and 12.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn squares(self) -> [u16; 9] {
        let mut keys = [0; 9];
        let mut n = 0;
        for row in 0..BOARD_SIZE - 1 {
            for col in 0..BOARD_SIZE - 1 {
                let shifted = self.bits >> ((row * BOARD_SIZE + col) * 4);
                // top pair stays in bits 0-7, bottom pair moves from 16-23 to 8-15
                keys[n] = ((shifted & 0x00FF) | ((shifted >> 8) & 0xFF00)) as u16;
                n += 1;
            }
        }
        keys
    }

    /// Returns the number of empty cells.
    #[must_use]
    pub fn empty_count(self) -> usize {
        self.empty_cells().count()
    }

    /// Iterates over the nibble indices of empty cells in ascending order.
    pub fn empty_cells(self) -> impl Iterator<Item = usize> {
        (0..CELL_COUNT).filter(move |&i| self.nibble(i) == 0)
    }

    /// Returns the largest exponent on the board (`0` for an empty board).
    #[must_use]
    pub fn max_exponent(self) -> u8 {
        (0..CELL_COUNT).map(|i| self.nibble(i)).max().unwrap_or(0)
    }

    /// Creates a board from a text grid of tile values for testing.
    ///
    /// Each non-blank line is one row (top to bottom) of four
    /// whitespace-separated cells: `.` or `0` for an empty cell, otherwise the
    /// tile value (`2`, `4`, `8`, ...).
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly four cells or a value is not a
    /// power of two in `2..=32768`.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert_eq!(
            lines.len(),
            BOARD_SIZE,
            "Board must have exactly {BOARD_SIZE} rows"
        );

        let mut board = Self::EMPTY;
        for (row, line) in lines.iter().enumerate() {
            let cells: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(
                cells.len(),
                BOARD_SIZE,
                "Each row must have exactly {BOARD_SIZE} cells, got {} at row {row}",
                cells.len()
            );
            for (col, cell) in cells.iter().enumerate() {
                let exponent = match *cell {
                    "." | "0" => 0,
                    value => {
                        let value: u32 = value
                            .parse()
                            .unwrap_or_else(|e| panic!("invalid tile {value:?}: {e}"));
                        assert!(
                            value >= 2 && value.is_power_of_two(),
                            "tile {value} is not a power of two"
                        );
                        #[expect(clippy::cast_possible_truncation)]
                        let exponent = value.trailing_zeros() as u8;
                        exponent
                    }
                };
                board = board.with_tile(row, col, exponent);
            }
        }
        board
    }
}

/// Converts a tile exponent to the tile value shown to players.
#[inline]
#[must_use]
pub const fn tile_value(exponent: u8) -> u32 {
    if exponent == 0 { 0 } else { 1 << exponent }
}

impl From<u64> for BitBoard {
    fn from(bits: u64) -> Self {
        Self::from_bits(bits)
    }
}

impl From<BitBoard> for u64 {
    fn from(board: BitBoard) -> Self {
        board.bits
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBoard({:#018x})", self.bits)
    }
}

impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if col > 0 {
                    f.write_char(' ')?;
                }
                match self.tile(row, col) {
                    0 => write!(f, "{:>5}", '.')?,
                    exponent => write!(f, "{:>5}", tile_value(exponent))?,
                }
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
