use std::sync::OnceLock;

use super::bit_board::MAX_EXPONENT;

/// Number of distinct packed rows (one entry per 16-bit pattern).
pub const ROW_TABLE_SIZE: usize = 1 << 16;

/// Precomputed slide results for every possible packed row.
///
/// Rows are packed like [`BitBoard::row`](crate::BitBoard::row): cell 0 is the
/// low nibble. "Left" slides toward cell 0, "right" toward cell 3.
///
/// # Merge Rules
///
/// - Tiles slide over empty cells toward the target side.
/// - Two equal neighbouring tiles merge into one tile of the next exponent,
///   and the merged tile's value is added to the reward.
/// - A tile merges at most once per slide; merges happen from the target side
///   outward (`[2, 2, 2, .]` slides left into `[4, 2, ., .]`).
/// - Tiles at [`MAX_EXPONENT`] never merge, so every result still fits in a
///   nibble.
#[derive(Debug)]
pub struct RowTable {
    slide_left: Box<[u16]>,
    slide_right: Box<[u16]>,
    reward: Box<[u32]>,
}

static ROW_TABLE: OnceLock<RowTable> = OnceLock::new();

impl RowTable {
    /// Returns the shared table, building it on first use.
    pub fn get() -> &'static Self {
        ROW_TABLE.get_or_init(Self::build)
    }

    fn build() -> Self {
        let mut slide_left = vec![0; ROW_TABLE_SIZE].into_boxed_slice();
        let mut slide_right = vec![0; ROW_TABLE_SIZE].into_boxed_slice();
        let mut reward = vec![0; ROW_TABLE_SIZE].into_boxed_slice();

        for row in 0..=u16::MAX {
            let (moved, row_reward) = slide_row_left(row);
            slide_left[usize::from(row)] = moved;
            reward[usize::from(row)] = row_reward;
        }
        for row in 0..=u16::MAX {
            let mirrored = reverse_row(row);
            slide_right[usize::from(row)] = reverse_row(slide_left[usize::from(mirrored)]);
        }

        Self {
            slide_left,
            slide_right,
            reward,
        }
    }

    /// Returns the row after sliding toward cell 0 and the merge reward.
    #[inline]
    #[must_use]
    pub fn slide_left(&self, row: u16) -> (u16, u32) {
        let i = usize::from(row);
        (self.slide_left[i], self.reward[i])
    }

    /// Returns the row after sliding toward cell 3 and the merge reward.
    #[inline]
    #[must_use]
    pub fn slide_right(&self, row: u16) -> (u16, u32) {
        let i = usize::from(row);
        (self.slide_right[i], self.reward[usize::from(reverse_row(row))])
    }
}

/// Mirrors a packed row (cell 0 <-> cell 3, cell 1 <-> cell 2).
#[inline]
#[must_use]
pub const fn reverse_row(row: u16) -> u16 {
    (row >> 12) | ((row >> 4) & 0x00F0) | ((row << 4) & 0x0F00) | (row << 12)
}

fn slide_row_left(row: u16) -> (u16, u32) {
    let mut tiles = [0_u8; 4];
    let mut len = 0;
    for cell in 0..4 {
        #[expect(clippy::cast_possible_truncation)]
        let exponent = ((row >> (cell * 4)) & 0xF) as u8;
        if exponent != 0 {
            tiles[len] = exponent;
            len += 1;
        }
    }

    let mut result = [0_u8; 4];
    let mut reward = 0;
    let mut out = 0;
    let mut i = 0;
    while i < len {
        let exponent = tiles[i];
        if i + 1 < len && tiles[i + 1] == exponent && exponent < MAX_EXPONENT {
            result[out] = exponent + 1;
            reward += 1 << (exponent + 1);
            i += 2;
        } else {
            result[out] = exponent;
            i += 1;
        }
        out += 1;
    }

    let packed = result
        .iter()
        .enumerate()
        .fold(0, |acc, (cell, &exponent)| acc | (u16::from(exponent) << (cell * 4)));
    (packed, reward)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(cells: [u8; 4]) -> u16 {
        cells
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &e)| acc | (u16::from(e) << (i * 4)))
    }

    #[test]
    fn test_slide_left_compresses_and_merges() {
        let table = RowTable::get();
        assert_eq!(table.slide_left(pack([1, 1, 0, 0])), (pack([2, 0, 0, 0]), 4));
        assert_eq!(table.slide_left(pack([1, 0, 1, 0])), (pack([2, 0, 0, 0]), 4));
        assert_eq!(table.slide_left(pack([0, 0, 0, 3])), (pack([3, 0, 0, 0]), 0));
    }

    #[test]
    fn test_slide_left_no_double_merge() {
        let table = RowTable::get();
        assert_eq!(table.slide_left(pack([2, 1, 1, 0])), (pack([2, 2, 0, 0]), 4));
        assert_eq!(table.slide_left(pack([1, 1, 1, 1])), (pack([2, 2, 0, 0]), 8));
        assert_eq!(table.slide_left(pack([1, 1, 1, 0])), (pack([2, 1, 0, 0]), 4));
    }

    #[test]
    fn test_slide_right_mirrors_left() {
        let table = RowTable::get();
        assert_eq!(table.slide_right(pack([1, 1, 1, 0])), (pack([0, 0, 1, 2]), 4));
        assert_eq!(table.slide_right(pack([3, 0, 0, 0])), (pack([0, 0, 0, 3]), 0));
        assert_eq!(table.slide_right(pack([2, 2, 1, 1])), (pack([0, 0, 3, 2]), 12));
    }

    #[test]
    fn test_max_exponent_never_merges() {
        let table = RowTable::get();
        let row = pack([15, 15, 0, 0]);
        assert_eq!(table.slide_left(row), (row, 0));
    }

    #[test]
    fn test_reverse_row_is_involution() {
        for row in [0x0000, 0x1234, 0xFEDC, 0x000F] {
            assert_eq!(reverse_row(reverse_row(row)), row);
        }
        assert_eq!(reverse_row(0x1234), 0x4321);
    }
}
