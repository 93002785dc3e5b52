//! The grid engine: one configurable implementation covering the
//! single-grid and split-side layouts.
//!
//! All state is owned here; the rendering layer only reads derived values
//! and dispatches commands. Every mutating command writes the updated
//! record to the injected store before returning, so persisted state
//! never lags behind what the user can observe.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;

use crate::constants::{COLS, HALF, HIDE_MODE, MODE_COUNT, ROWS, VERSION_TEXT, VOWELS, keys};
use crate::coords::{self, CellKey};
use crate::highlights::HighlightMap;
use crate::matrix::{CanonicalMatrix, ColOffsets};
use crate::order::Order;
use crate::storage::{Storage, load_json, save_json};
use crate::substitution::{Substitution, SubstitutionInput};

/// Which visual half of a split grid a row swap addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// One 36-column grid, label column at slot 0 only.
    Single,
    /// Two 18-column halves with independent row orders and a second
    /// label column on the far right.
    Split,
}

impl Layout {
    fn col_slots(self) -> usize {
        match self {
            Layout::Single => COLS + 1,
            Layout::Split => COLS + 2,
        }
    }
}

/// Build-time shape of the engine; runtime display choices live in
/// [`Toggles`].
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub layout: Layout,
    pub mode_count: u8,
    pub vowels: bool,
    pub substitution: bool,
    pub matching: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            layout: Layout::Split,
            mode_count: MODE_COUNT,
            vowels: true,
            substitution: true,
            matching: true,
        }
    }
}

/// Persisted display toggles, all off by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Toggles {
    pub same_letters_on_hover: bool,
    pub matching_letters: bool,
    pub vowels: bool,
    pub substitutions: bool,
    pub highlight_same_letters_when_clicked: bool,
}

/// Everything the renderer needs to style one data cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellFlags {
    /// Colored highlight mode, if any (never the hidden mode).
    pub mode: Option<u8>,
    pub hidden: bool,
    pub vowel: bool,
    /// Display letter equals its counterpart in the other half.
    pub matching: bool,
    /// Display letter occurs somewhere in the other half of this row.
    pub common: bool,
    /// Display letter equals the currently hovered letter.
    pub hovered: bool,
}

// Recomputed lazily after any mutation of offsets, orders or the shown
// substitution; per-cell reads then hit precomputed rows.
struct DerivedCache {
    rotated: [[char; COLS]; ROWS],
    /// Per display row, per half: bitmask of display letters present.
    half_letters: [[u32; 2]; ROWS],
}

pub struct GridEngine<S: Storage> {
    config: EngineConfig,
    store: S,
    matrix: CanonicalMatrix,
    offsets: ColOffsets,
    row_order: Order,
    row_order_right: Order,
    col_order: Order,
    substitution: Substitution,
    highlights: HighlightMap,
    highlight_mode: u8,
    toggles: Toggles,
    hovered: Option<char>,
    cache: RefCell<Option<DerivedCache>>,
}

impl<S: Storage> GridEngine<S> {
    pub fn new(config: EngineConfig, store: S) -> Self {
        let mut engine = GridEngine {
            config,
            store,
            matrix: CanonicalMatrix::new(),
            offsets: ColOffsets::new(),
            row_order: Order::identity(ROWS + 1, ROWS),
            row_order_right: Order::identity(ROWS + 1, ROWS),
            col_order: Order::identity(config.layout.col_slots(), COLS),
            substitution: Substitution::identity(),
            highlights: HighlightMap::new(),
            highlight_mode: 0,
            toggles: Toggles::default(),
            hovered: None,
            cache: RefCell::new(None),
        };
        engine.load();
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn toggles(&self) -> Toggles {
        self.toggles
    }

    pub fn highlight_mode(&self) -> u8 {
        self.highlight_mode
    }

    pub fn hovered(&self) -> Option<char> {
        self.hovered
    }

    pub fn highlights(&self) -> &HighlightMap {
        &self.highlights
    }

    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    pub fn col_order(&self) -> &[usize] {
        self.col_order.slots()
    }

    pub fn row_order(&self, side: Side) -> &[usize] {
        self.row_order_ref(side).slots()
    }

    /// Raw offset for a 1-based data column.
    pub fn offset(&self, col: usize) -> u8 {
        self.offsets.get(col)
    }

    /// Offset as shown in the header row: how far the column has been
    /// shifted up, fading to 0 when unrotated.
    pub fn offset_label(&self, col: usize) -> u8 {
        (ROWS as u8 - self.offsets.get(col)) % ROWS as u8
    }

    // ---- coordinate mapping -------------------------------------------

    fn row_order_ref(&self, side: Side) -> &Order {
        match (self.config.layout, side) {
            (Layout::Split, Side::Right) => &self.row_order_right,
            _ => &self.row_order,
        }
    }

    /// The half a display column slot is rendered in.
    fn side_of_slot(&self, col_slot: usize) -> Side {
        if self.config.layout == Layout::Split && col_slot > HALF {
            Side::Right
        } else {
            Side::Left
        }
    }

    fn is_data_slot(&self, row_slot: usize, col_slot: usize) -> bool {
        (1..=ROWS).contains(&row_slot) && (1..=COLS).contains(&col_slot)
    }

    /// Canonical identity of the cell at a display position. Rendering,
    /// hover and click all resolve through this one mapping.
    pub fn canonical_key(&self, row_slot: usize, col_slot: usize) -> Option<CellKey> {
        if !self.is_data_slot(row_slot, col_slot) {
            return None;
        }
        let col = self.col_order.at(col_slot);
        let row = self.row_order_ref(self.side_of_slot(col_slot)).at(row_slot);
        Some(coords::canonical_key(row, col, &self.offsets))
    }

    // ---- derived display views ----------------------------------------

    fn substitution_shown(&self) -> bool {
        self.config.substitution && self.toggles.substitutions
    }

    fn invalidate(&mut self) {
        *self.cache.borrow_mut() = None;
    }

    fn cache(&self) -> Ref<'_, DerivedCache> {
        if self.cache.borrow().is_none() {
            *self.cache.borrow_mut() = Some(self.build_cache());
        }
        Ref::map(self.cache.borrow(), |c| c.as_ref().unwrap())
    }

    fn build_cache(&self) -> DerivedCache {
        let rotated = self.matrix.rotated(&self.offsets);
        let mut half_letters = [[0u32; 2]; ROWS];
        for row_slot in 1..=ROWS {
            for col_slot in 1..=COLS {
                let col = self.col_order.at(col_slot);
                let row = self.row_order_ref(self.side_of_slot(col_slot)).at(row_slot);
                let mut letter = rotated[row - 1][col - 1];
                if self.substitution_shown() {
                    letter = self.substitution.apply(letter);
                }
                if letter.is_ascii_uppercase() {
                    let half = if col_slot <= HALF { 0 } else { 1 };
                    half_letters[row_slot - 1][half] |= 1 << (letter as u8 - b'A');
                }
            }
        }
        DerivedCache {
            rotated,
            half_letters,
        }
    }

    /// Display letter of a data cell, after rotation, reordering and the
    /// substitution cipher (when shown).
    pub fn display_letter(&self, row_slot: usize, col_slot: usize) -> Option<char> {
        if !self.is_data_slot(row_slot, col_slot) {
            return None;
        }
        let col = self.col_order.at(col_slot);
        let row = self.row_order_ref(self.side_of_slot(col_slot)).at(row_slot);
        let letter = self.cache().rotated[row - 1][col - 1];
        Some(if self.substitution_shown() {
            self.substitution.apply(letter)
        } else {
            letter
        })
    }

    /// Cell content as rendered: header numbers, label letters, or the
    /// display letter. Pseudo corners and out-of-range slots are empty.
    pub fn display_value(&self, row_slot: usize, col_slot: usize) -> String {
        let label_slot = col_slot == 0
            || (self.config.layout == Layout::Split && col_slot == COLS + 1);
        if row_slot == 0 {
            if label_slot || col_slot > self.config.layout.col_slots() - 1 {
                return String::new();
            }
            return self.col_order.at(col_slot).to_string();
        }
        if label_slot && (1..=ROWS).contains(&row_slot) {
            let side = self.side_of_slot(col_slot);
            let row = self.row_order_ref(side).at(row_slot);
            return coords::row_letter(row - 1).to_string();
        }
        match self.display_letter(row_slot, col_slot) {
            Some(letter) => letter.to_string(),
            None => String::new(),
        }
    }

    /// Style tags for a data cell; pseudo rows/columns get the default.
    pub fn cell_flags(&self, row_slot: usize, col_slot: usize) -> CellFlags {
        let Some(key) = self.canonical_key(row_slot, col_slot) else {
            return CellFlags::default();
        };
        let Some(letter) = self.display_letter(row_slot, col_slot) else {
            return CellFlags::default();
        };
        let mut flags = CellFlags::default();
        match self.highlights.get(key) {
            Some(mode) if mode == HIDE_MODE => flags.hidden = true,
            Some(mode) => flags.mode = Some(mode),
            None => {}
        }
        if self.config.vowels && self.toggles.vowels {
            flags.vowel = VOWELS.contains(&letter);
        }
        if self.config.matching && self.toggles.matching_letters {
            let mirror_slot = if col_slot <= HALF {
                col_slot + HALF
            } else {
                col_slot - HALF
            };
            flags.matching = self.display_letter(row_slot, mirror_slot) == Some(letter);
            if letter.is_ascii_uppercase() {
                let other_half = if col_slot <= HALF { 1 } else { 0 };
                let mask = self.cache().half_letters[row_slot - 1][other_half];
                flags.common = mask & (1 << (letter as u8 - b'A')) != 0;
            }
        }
        if self.toggles.same_letters_on_hover {
            flags.hovered = self.hovered == Some(letter);
        }
        flags
    }

    /// Plain-text rendering of the display matrix: one line per row,
    /// letters in groups of six, halves separated by a double space,
    /// hidden cells blanked.
    pub fn export_text(&self) -> String {
        let mut lines = Vec::with_capacity(ROWS);
        for row_slot in 1..=ROWS {
            let mut letters = Vec::with_capacity(COLS);
            for col_slot in 1..=COLS {
                let hidden = self
                    .canonical_key(row_slot, col_slot)
                    .is_some_and(|key| self.highlights.is_hidden(key));
                let letter = if hidden {
                    ' '
                } else {
                    self.display_letter(row_slot, col_slot).unwrap_or(' ')
                };
                letters.push(letter);
            }
            let halves: Vec<String> = letters
                .chunks(HALF)
                .map(|half| {
                    half.chunks(6)
                        .map(|group| group.iter().collect::<String>())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            lines.push(halves.join("  "));
        }
        lines.join("\n")
    }

    // ---- commands ------------------------------------------------------

    /// Toggle the clicked cell with the active mode, or fan out to every
    /// cell showing the same letter when that toggle is on.
    pub fn toggle_cell(&mut self, row_slot: usize, col_slot: usize) -> bool {
        let Some(key) = self.canonical_key(row_slot, col_slot) else {
            return false;
        };
        if self.toggles.highlight_same_letters_when_clicked {
            if let Some(letter) = self.display_letter(row_slot, col_slot) {
                return self.highlight_all_matching(letter);
            }
        }
        self.highlights.toggle(key, self.highlight_mode);
        self.save_highlights();
        true
    }

    /// Apply the active mode to every data cell currently displaying
    /// `value`, or clear them all if they already uniformly carry it.
    pub fn highlight_all_matching(&mut self, value: char) -> bool {
        if !value.is_ascii_uppercase() {
            return false;
        }
        let mut matched = Vec::new();
        for row_slot in 1..=ROWS {
            for col_slot in 1..=COLS {
                if self.display_letter(row_slot, col_slot) == Some(value)
                    && let Some(key) = self.canonical_key(row_slot, col_slot)
                {
                    matched.push(key);
                }
            }
        }
        if matched.is_empty() {
            return false;
        }
        self.highlights.toggle_group(&matched, self.highlight_mode);
        self.save_highlights();
        true
    }

    pub fn swap_rows(&mut self, from: char, to: char, side: Side) -> bool {
        let (Some(from), Some(to)) = (coords::letter_to_row(from), coords::letter_to_row(to))
        else {
            return false;
        };
        let order = match (self.config.layout, side) {
            (Layout::Split, Side::Right) => &mut self.row_order_right,
            _ => &mut self.row_order,
        };
        if !order.swap(from, to) {
            return false;
        }
        let key = match (self.config.layout, side) {
            (Layout::Split, Side::Right) => keys::ROW_ORDER_RIGHT,
            _ => keys::ROW_ORDER,
        };
        let slots = self.row_order_ref(side).slots().to_vec();
        save_json(&mut self.store, key, &slots);
        self.invalidate();
        true
    }

    pub fn swap_cols(&mut self, from: usize, to: usize) -> bool {
        if !self.col_order.swap(from, to) {
            return false;
        }
        let slots = self.col_order.slots().to_vec();
        save_json(&mut self.store, keys::COL_ORDER, &slots);
        self.invalidate();
        true
    }

    pub fn rotate_column(&mut self, col: usize, delta: i8) -> bool {
        if !self.offsets.transpose(col, delta) {
            return false;
        }
        self.save_offsets();
        self.invalidate();
        true
    }

    pub fn reset_column_offset(&mut self, col: usize) -> bool {
        if !self.offsets.reset_column(col) {
            return false;
        }
        self.save_offsets();
        self.invalidate();
        true
    }

    pub fn set_substitution(&mut self, letter: char, input: SubstitutionInput) -> bool {
        if !self.config.substitution || !self.substitution.set(letter, input) {
            return false;
        }
        save_json(
            &mut self.store,
            keys::SUBSTITUTIONS,
            &self.substitution.entries(),
        );
        self.invalidate();
        true
    }

    pub fn set_highlight_mode(&mut self, mode: u8) -> bool {
        if mode >= self.config.mode_count {
            return false;
        }
        self.highlight_mode = mode;
        save_json(&mut self.store, keys::HIGHLIGHT_MODE, &mode);
        true
    }

    /// Transient hover state; not persisted.
    pub fn set_hovered(&mut self, letter: Option<char>) {
        self.hovered = letter.map(|l| l.to_ascii_uppercase());
    }

    pub fn set_toggles(&mut self, toggles: Toggles) {
        let substitution_changed = toggles.substitutions != self.toggles.substitutions;
        self.toggles = toggles;
        save_json(
            &mut self.store,
            keys::SHOW_SAME_LETTERS_ON_HOVER,
            &toggles.same_letters_on_hover,
        );
        save_json(
            &mut self.store,
            keys::SHOW_MATCHING_LETTERS,
            &toggles.matching_letters,
        );
        save_json(&mut self.store, keys::SHOW_VOWELS, &toggles.vowels);
        save_json(
            &mut self.store,
            keys::SHOW_SUBSTITUTIONS,
            &toggles.substitutions,
        );
        save_json(
            &mut self.store,
            keys::HIGHLIGHT_SAME_LETTERS_WHEN_CLICKED,
            &toggles.highlight_same_letters_when_clicked,
        );
        if substitution_changed {
            self.invalidate();
        }
    }

    // ---- resets --------------------------------------------------------

    pub fn reset_rows(&mut self) {
        self.row_order.reset();
        self.row_order_right.reset();
        self.store.remove(keys::ROW_ORDER);
        self.store.remove(keys::ROW_ORDER_RIGHT);
        self.invalidate();
    }

    pub fn reset_cols(&mut self) {
        self.col_order.reset();
        self.store.remove(keys::COL_ORDER);
        self.invalidate();
    }

    pub fn reset_offsets(&mut self) {
        self.offsets.reset();
        self.store.remove(keys::COL_OFFSETS);
        self.invalidate();
    }

    pub fn reset_highlights(&mut self) {
        self.highlights.reset();
        self.store.remove(keys::HIGHLIGHTS);
    }

    pub fn reset_substitutions(&mut self) {
        self.substitution.reset();
        self.store.remove(keys::SUBSTITUTIONS);
        self.invalidate();
    }

    pub fn reset_all(&mut self) {
        self.reset_rows();
        self.reset_cols();
        self.reset_highlights();
        self.reset_offsets();
        self.reset_substitutions();
    }

    // ---- persistence ---------------------------------------------------

    fn save_highlights(&mut self) {
        let encoded = self.highlights.encode();
        self.store.set(keys::HIGHLIGHTS, &encoded);
    }

    fn save_offsets(&mut self) {
        let offsets = self.offsets.as_slice().to_vec();
        save_json(&mut self.store, keys::COL_OFFSETS, &offsets);
    }

    /// Restore each record independently, falling back to defaults for
    /// anything missing or malformed.
    fn load(&mut self) {
        if let Some(raw) = self.store.get(keys::HIGHLIGHTS) {
            match HighlightMap::decode(&raw) {
                Some(map) => self.highlights = map,
                // Never partially trust an unvalidated map.
                None => self.store.remove(keys::HIGHLIGHTS),
            }
        }
        if let Some(values) = load_json::<_, Vec<usize>>(&self.store, keys::ROW_ORDER)
            && let Some(order) = Order::from_vec(values, ROWS + 1, ROWS)
        {
            self.row_order = order;
        }
        if self.config.layout == Layout::Split
            && let Some(values) = load_json::<_, Vec<usize>>(&self.store, keys::ROW_ORDER_RIGHT)
            && let Some(order) = Order::from_vec(values, ROWS + 1, ROWS)
        {
            self.row_order_right = order;
        }
        if let Some(values) = load_json::<_, Vec<usize>>(&self.store, keys::COL_ORDER)
            && let Some(order) = Order::from_vec(values, self.config.layout.col_slots(), COLS)
        {
            self.col_order = order;
        }
        if let Some(values) = load_json::<_, Vec<u8>>(&self.store, keys::COL_OFFSETS)
            && let Some(offsets) = ColOffsets::from_vec(values)
        {
            self.offsets = offsets;
        }
        if let Some(entries) = load_json::<_, HashMap<char, char>>(&self.store, keys::SUBSTITUTIONS)
        {
            self.substitution = Substitution::from_entries(&entries);
        }
        if let Some(mode) = load_json::<_, u8>(&self.store, keys::HIGHLIGHT_MODE)
            && mode < self.config.mode_count
        {
            self.highlight_mode = mode;
        }
        self.toggles = Toggles {
            same_letters_on_hover: load_json(&self.store, keys::SHOW_SAME_LETTERS_ON_HOVER)
                .unwrap_or(false),
            matching_letters: load_json(&self.store, keys::SHOW_MATCHING_LETTERS).unwrap_or(false),
            vowels: load_json(&self.store, keys::SHOW_VOWELS).unwrap_or(false),
            substitutions: load_json(&self.store, keys::SHOW_SUBSTITUTIONS).unwrap_or(false),
            highlight_same_letters_when_clicked: load_json(
                &self.store,
                keys::HIGHLIGHT_SAME_LETTERS_WHEN_CLICKED,
            )
            .unwrap_or(false),
        };
        // Version mismatch only refreshes the marker; it is the hook a
        // future schema migration would use.
        if self.store.get(keys::VERSION).as_deref() != Some(VERSION_TEXT) {
            self.store.set(keys::VERSION, VERSION_TEXT);
        }
    }
}
