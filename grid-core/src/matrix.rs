//! The canonical letter matrix and the per-column rotation layer.

use crate::constants::{COLS, ROW_BLOCKS, ROWS};

/// The immutable 10x36 source-of-truth grid, assembled once from the two
/// 18-letter blocks of each row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalMatrix {
    rows: [[char; COLS]; ROWS],
}

impl CanonicalMatrix {
    pub fn new() -> Self {
        let mut rows = [[' '; COLS]; ROWS];
        for (r, [left, right]) in ROW_BLOCKS.iter().enumerate() {
            for (c, letter) in left.chars().chain(right.chars()).enumerate() {
                rows[r][c] = letter;
            }
        }
        CanonicalMatrix { rows }
    }

    /// Letter at a 0-based canonical position.
    pub fn letter(&self, row: usize, col: usize) -> char {
        self.rows[row][col]
    }

    /// The grid with each column cyclically shifted by its offset: row `r`
    /// of the result holds canonical row `(r + offset) % 10` per column.
    pub fn rotated(&self, offsets: &ColOffsets) -> [[char; COLS]; ROWS] {
        let mut out = [[' '; COLS]; ROWS];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                let shifted = (r + offsets.get(c + 1) as usize) % ROWS;
                *cell = self.rows[shifted][c];
            }
        }
        out
    }
}

impl Default for CanonicalMatrix {
    fn default() -> Self {
        Self::new()
    }
}

/// Cyclic row offset per data column. Slot 0 mirrors the label
/// pseudo-column and stays at zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColOffsets {
    offsets: Vec<u8>,
}

impl ColOffsets {
    pub fn new() -> Self {
        ColOffsets {
            offsets: vec![0; COLS + 1],
        }
    }

    /// Offset for a 1-based column, zero outside the data range.
    pub fn get(&self, col: usize) -> u8 {
        if col >= 1 && col <= COLS {
            self.offsets[col]
        } else {
            0
        }
    }

    /// Decrease the column's offset by `delta`, normalized into `0..10`.
    /// `delta == -1` is the user-facing "shift up". Pseudo-columns are a
    /// silent no-op.
    pub fn transpose(&mut self, col: usize, delta: i8) -> bool {
        if col < 1 || col > COLS {
            return false;
        }
        let next = (self.offsets[col] as i16 - delta as i16).rem_euclid(ROWS as i16);
        self.offsets[col] = next as u8;
        true
    }

    pub fn reset_column(&mut self, col: usize) -> bool {
        if col < 1 || col > COLS {
            return false;
        }
        self.offsets[col] = 0;
        true
    }

    pub fn reset(&mut self) {
        self.offsets = vec![0; COLS + 1];
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.offsets
    }

    /// Restore from a persisted array. The cardinality must match exactly;
    /// stored values are normalized modulo 10.
    pub fn from_vec(values: Vec<u8>) -> Option<Self> {
        if values.len() != COLS + 1 {
            return None;
        }
        let mut offsets: Vec<u8> = values.into_iter().map(|v| v % ROWS as u8).collect();
        offsets[0] = 0;
        Some(ColOffsets { offsets })
    }
}

impl Default for ColOffsets {
    fn default() -> Self {
        Self::new()
    }
}
