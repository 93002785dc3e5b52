//! Canonical cell identity and the display-to-canonical mapping.
//!
//! Every annotation is keyed by a [`CellKey`], never by display position,
//! so rearranging the grid never detaches a marking from its letter.

use serde::{Deserialize, Serialize};

use crate::constants::{COLS, ROWS};
use crate::matrix::ColOffsets;

/// Stable identity of a cell: row letter (`A..J`) plus the original
/// column number (1..36).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub row: char,
    pub col: u8,
}

impl CellKey {
    pub fn new(row: char, col: usize) -> Self {
        CellKey {
            row,
            col: col as u8,
        }
    }

    /// Encoded form used in the persisted store, e.g. `"C,17"`.
    pub fn encode(&self) -> String {
        format!("{},{}", self.row, self.col)
    }

    /// Parse and validate an encoded key. Rejects letters outside the
    /// row-label set and columns outside the data range.
    pub fn parse(s: &str) -> Option<CellKey> {
        let (letter, col) = s.split_once(',')?;
        let mut chars = letter.chars();
        let row = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !row.is_ascii_uppercase() || (row as usize - 'A' as usize) >= ROWS {
            return None;
        }
        let col: usize = col.parse().ok()?;
        if col < 1 || col > COLS {
            return None;
        }
        Some(CellKey::new(row, col))
    }
}

/// Letter label for a 0-based row index (`0 -> 'A'`).
pub fn row_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// 1-based row index for a label letter, `None` outside `A..J`.
pub fn letter_to_row(letter: char) -> Option<usize> {
    if !letter.is_ascii_uppercase() {
        return None;
    }
    let index = letter as usize - 'A' as usize + 1;
    if index > ROWS { None } else { Some(index) }
}

/// The one place the display-to-canonical mapping is computed.
///
/// `row` and `col` are the canonical indices already resolved through the
/// current orders (both 1-based). Rotation is applied in canonical-row
/// space: the key names the letter currently occupying the position, so a
/// rotating column carries each annotation along with its letter.
pub fn canonical_key(row: usize, col: usize, offsets: &ColOffsets) -> CellKey {
    let effective = (row - 1 + offsets.get(col) as usize) % ROWS;
    CellKey::new(row_letter(effective), col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_encoding() {
        let key = CellKey::new('C', 17);
        assert_eq!(key.encode(), "C,17");
        assert_eq!(CellKey::parse("C,17"), Some(key));
    }

    #[test]
    fn parse_rejects_out_of_range_keys() {
        assert_eq!(CellKey::parse("K,1"), None); // letter past J
        assert_eq!(CellKey::parse("a,1"), None);
        assert_eq!(CellKey::parse("A,0"), None);
        assert_eq!(CellKey::parse("A,37"), None);
        assert_eq!(CellKey::parse("AB,3"), None);
        assert_eq!(CellKey::parse("A"), None);
        assert_eq!(CellKey::parse("A,x"), None);
    }

    #[test]
    fn letters_and_rows_invert() {
        assert_eq!(row_letter(0), 'A');
        assert_eq!(row_letter(9), 'J');
        assert_eq!(letter_to_row('A'), Some(1));
        assert_eq!(letter_to_row('J'), Some(10));
        assert_eq!(letter_to_row('K'), None);
        assert_eq!(letter_to_row('1'), None);
    }

    #[test]
    fn rotation_shifts_the_canonical_key() {
        let mut offsets = ColOffsets::new();
        assert_eq!(canonical_key(1, 5, &offsets), CellKey::new('A', 5));
        // Shifting column 5 up once moves row 1 onto canonical row 2.
        offsets.transpose(5, -1);
        assert_eq!(canonical_key(1, 5, &offsets), CellKey::new('B', 5));
        assert_eq!(canonical_key(10, 5, &offsets), CellKey::new('A', 5));
        // Keys in other columns are untouched.
        assert_eq!(canonical_key(1, 6, &offsets), CellKey::new('A', 6));
    }

    #[test]
    fn rotating_back_restores_every_key() {
        let mut offsets = ColOffsets::new();
        let before: Vec<_> = (1..=10).map(|r| canonical_key(r, 7, &offsets)).collect();
        offsets.transpose(7, 3);
        offsets.transpose(7, -3);
        let after: Vec<_> = (1..=10).map(|r| canonical_key(r, 7, &offsets)).collect();
        assert_eq!(before, after);
    }
}
