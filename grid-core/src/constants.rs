//! Grid dimensions and the canonical letter data.
//!
//! The matrix size is a fixed property of the puzzle: 10 rows of 36
//! letters, recorded as two 18-letter blocks per row.

/// Number of data rows.
pub const ROWS: usize = 10;
/// Number of data columns (two 18-column halves).
pub const COLS: usize = 36;
/// Width of one half of the grid.
pub const HALF: usize = 18;

/// Highlight mode reserved for "hidden" cells (slot 5 of the picker).
pub const HIDE_MODE: u8 = 5;
/// Number of selectable highlight modes (two picker rows of six).
pub const MODE_COUNT: u8 = 12;

pub const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// Build/version marker persisted alongside the grid state.
pub const VERSION_TEXT: &str = "v0.3.1 / DAS#0437";

/// The two fixed 18-letter blocks composing each canonical row.
pub const ROW_BLOCKS: [[&str; 2]; ROWS] = [
    ["YPWAIETOAENRMHMGEN", "MIVWDMKDTCBANGBFKW"],
    ["NQLLWQMIRLVFSDROTN", "VKIIAAKIRLHADHESVG"],
    ["LINVADMCURYBOFEUAI", "DRULRHTDEESEBREPYE"],
    ["VRBOOHHSDEWEAANANN", "EERATOLITEJEPEPZFN"],
    ["ANHIITBICPATELTTMH", "FEKETCHPMSNAFEWNQM"],
    ["SFTOAINWLXARKLANFE", "NEWEDSANENTEGQLHUA"],
    ["OENIRSRONOFKGVEKAR", "TLBGONGUWHILPAFNAS"],
    ["EHERESSOVEMDGJTCWS", "RDMCORRODAPJNLSAWY"],
    ["TASEWNHEVGRANOKNOT", "SHTOELHTICUTMLHOIO"],
    ["HRFRONLRATTATTIQAT", "ANEUOASGNHSFALEHND"],
];

/// Record names in the persisted key-value store.
pub mod keys {
    pub const HIGHLIGHTS: &str = "highlights";
    pub const ROW_ORDER: &str = "rowOrder";
    pub const ROW_ORDER_RIGHT: &str = "rowOrderRight";
    pub const COL_ORDER: &str = "colOrder";
    pub const COL_OFFSETS: &str = "colOffsets";
    pub const SUBSTITUTIONS: &str = "substitutions";
    pub const HIGHLIGHT_MODE: &str = "highlightMode";
    pub const SHOW_SAME_LETTERS_ON_HOVER: &str = "showSameLettersOnHover";
    pub const SHOW_MATCHING_LETTERS: &str = "showMatchingLetters";
    pub const SHOW_VOWELS: &str = "showVowels";
    pub const SHOW_SUBSTITUTIONS: &str = "showSubstitutions";
    pub const HIGHLIGHT_SAME_LETTERS_WHEN_CLICKED: &str = "highlightSameLettersWhenClicked";
    pub const VERSION: &str = "version";
}
