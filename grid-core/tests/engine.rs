//! End-to-end tests of the engine against an in-memory store.

use grid_core::constants::keys;
use grid_core::{
    CellKey, EngineConfig, GridEngine, HIDE_MODE, Layout, MemoryStore, Side, Storage,
    SubstitutionInput, Toggles, VERSION_TEXT,
};

fn engine() -> GridEngine<MemoryStore> {
    GridEngine::new(EngineConfig::default(), MemoryStore::new())
}

fn single_engine() -> GridEngine<MemoryStore> {
    let config = EngineConfig {
        layout: Layout::Single,
        ..EngineConfig::default()
    };
    GridEngine::new(config, MemoryStore::new())
}

#[test]
fn default_display_shows_the_canonical_matrix() {
    let engine = engine();
    assert_eq!(engine.display_value(1, 1), "Y");
    assert_eq!(engine.display_value(1, 19), "M");
    assert_eq!(engine.display_value(10, 36), "D");
    // Pseudo rows and columns.
    assert_eq!(engine.display_value(0, 0), "");
    assert_eq!(engine.display_value(0, 5), "5");
    assert_eq!(engine.display_value(3, 0), "C");
    assert_eq!(engine.display_value(3, 37), "C");
}

#[test]
fn rotating_column_five_up_once() {
    let mut engine = engine();
    assert!(engine.rotate_column(5, -1));
    // Display row 1 now shows the letter from canonical row 2.
    assert_eq!(engine.display_value(1, 5), "W");
    assert_eq!(engine.offset(5), 1);
    assert_eq!(engine.offset_label(5), 9);
    // Neighboring columns are untouched.
    assert_eq!(engine.display_value(1, 4), "A");
}

#[test]
fn rotation_does_not_detach_annotations_from_letters() {
    let mut engine = engine();
    engine.set_highlight_mode(2);
    engine.toggle_cell(1, 5); // the 'I' at the top of column 5
    assert_eq!(engine.cell_flags(1, 5).mode, Some(2));
    engine.rotate_column(5, -1);
    // The highlight followed the letter down to the bottom wrap.
    assert_eq!(engine.display_value(10, 5), "I");
    assert_eq!(engine.cell_flags(10, 5).mode, Some(2));
    assert_eq!(engine.cell_flags(1, 5).mode, None);
    engine.rotate_column(5, 1);
    assert_eq!(engine.cell_flags(1, 5).mode, Some(2));
}

#[test]
fn swapping_columns_moves_annotations_with_the_column() {
    let mut engine = engine();
    engine.set_highlight_mode(1);
    engine.toggle_cell(1, 3);
    let key = engine.canonical_key(1, 3).unwrap();
    assert_eq!(key, CellKey::new('A', 3));

    assert!(engine.swap_cols(3, 7));
    // Display slot 3 now renders column 7 and vice versa.
    assert_eq!(engine.display_value(0, 3), "7");
    assert_eq!(engine.display_value(0, 7), "3");
    assert_eq!(engine.display_value(1, 3), "T");
    assert_eq!(engine.display_value(1, 7), "W");
    assert_eq!(engine.display_value(1, 4), "A");
    // The highlight shows up wherever column 3 is rendered now.
    assert_eq!(engine.cell_flags(1, 7).mode, Some(1));
    assert_eq!(engine.canonical_key(1, 7), Some(key));
    assert_eq!(engine.cell_flags(1, 3).mode, None);

    // Swapping again restores the original order.
    assert!(engine.swap_cols(3, 7));
    assert_eq!(engine.display_value(1, 3), "W");
    assert_eq!(engine.cell_flags(1, 3).mode, Some(1));
}

#[test]
fn canonical_keys_survive_any_permutation() {
    let mut engine = engine();
    let key = engine.canonical_key(3, 4).unwrap();
    assert_eq!(key, CellKey::new('C', 4));

    assert!(engine.swap_rows('C', 'H', Side::Left));
    assert_eq!(engine.canonical_key(8, 4), Some(key));
    assert!(engine.swap_cols(4, 9));
    assert_eq!(engine.canonical_key(8, 9), Some(key));
    // Substitution is display-only and never touches identity.
    engine.set_substitution('L', SubstitutionInput::Letter('Z'));
    engine.set_toggles(Toggles {
        substitutions: true,
        ..Toggles::default()
    });
    assert_eq!(engine.canonical_key(8, 9), Some(key));
}

#[test]
fn split_sides_reorder_rows_independently() {
    let mut engine = engine();
    assert!(engine.swap_rows('A', 'C', Side::Right));
    // Right half of display row 1 now comes from canonical row 3.
    assert_eq!(engine.display_value(1, 37), "C");
    assert_eq!(engine.display_value(1, 19), "D");
    // Left half is untouched.
    assert_eq!(engine.display_value(1, 0), "A");
    assert_eq!(engine.display_value(1, 1), "Y");
}

#[test]
fn single_layout_uses_one_row_order() {
    let mut engine = single_engine();
    assert!(engine.swap_rows('A', 'B', Side::Right));
    assert_eq!(engine.display_value(1, 0), "B");
    assert_eq!(engine.display_value(1, 1), "N");
    // There is no terminal label column.
    assert_eq!(engine.display_value(1, 37), "");
}

#[test]
fn invalid_commands_leave_state_unchanged() {
    let mut engine = engine();
    assert!(!engine.rotate_column(0, -1));
    assert!(!engine.rotate_column(37, 1));
    assert!(!engine.swap_cols(0, 7));
    assert!(!engine.swap_rows('K', 'A', Side::Left));
    assert!(!engine.set_substitution('A', SubstitutionInput::Letter('4')));
    assert!(!engine.set_highlight_mode(12));
    assert!(!engine.toggle_cell(0, 5));
    assert!(!engine.toggle_cell(5, 0));
    assert_eq!(engine.display_value(1, 1), "Y");
    assert!(engine.highlights().is_empty());
}

#[test]
fn toggling_modes_on_one_cell() {
    let mut engine = engine();
    engine.set_highlight_mode(2);
    engine.toggle_cell(5, 5);
    assert_eq!(engine.cell_flags(5, 5).mode, Some(2));
    // Same mode again clears the annotation.
    engine.toggle_cell(5, 5);
    assert_eq!(engine.cell_flags(5, 5).mode, None);
    // A different mode overwrites instead of stacking.
    engine.toggle_cell(5, 5);
    engine.set_highlight_mode(3);
    engine.toggle_cell(5, 5);
    assert_eq!(engine.cell_flags(5, 5).mode, Some(3));
    // Hide is mutually exclusive with colored modes.
    engine.set_highlight_mode(HIDE_MODE);
    engine.toggle_cell(5, 5);
    let flags = engine.cell_flags(5, 5);
    assert!(flags.hidden);
    assert_eq!(flags.mode, None);
}

#[test]
fn batch_highlight_sets_then_clears_matching_cells() {
    let mut engine = engine();
    engine.set_highlight_mode(4);
    // Pre-mark one 'E' so the group is mixed, not uniform.
    engine.toggle_cell(1, 6);
    assert!(engine.highlight_all_matching('E'));
    for row in 1..=10 {
        for col in 1..=36 {
            if engine.display_value(row, col) == "E" {
                assert_eq!(engine.cell_flags(row, col).mode, Some(4));
            }
        }
    }
    // Uniformly set: the second call clears the whole group.
    assert!(engine.highlight_all_matching('E'));
    assert!(engine.highlights().is_empty());
    // No cell displays a lowercase letter.
    assert!(!engine.highlight_all_matching('e'));
}

#[test]
fn clicking_fans_out_when_the_toggle_is_on() {
    let mut engine = engine();
    engine.set_toggles(Toggles {
        highlight_same_letters_when_clicked: true,
        ..Toggles::default()
    });
    engine.set_highlight_mode(1);
    // The only 'X' in the grid sits at canonical F,10.
    engine.toggle_cell(6, 10);
    assert_eq!(engine.highlights().get(CellKey::new('F', 10)), Some(1));
    engine.toggle_cell(6, 10);
    assert!(engine.highlights().is_empty());
}

#[test]
fn substitution_changes_display_only_while_shown() {
    let mut engine = engine();
    assert!(engine.set_substitution('Y', SubstitutionInput::Letter('Q')));
    assert!(!engine.substitution().is_identity());
    // Not shown yet.
    assert_eq!(engine.display_value(1, 1), "Y");
    engine.set_toggles(Toggles {
        substitutions: true,
        ..Toggles::default()
    });
    assert_eq!(engine.display_value(1, 1), "Q");
    // Erase restores the identity mapping for that letter.
    assert!(engine.set_substitution('Y', SubstitutionInput::Erase));
    assert_eq!(engine.display_value(1, 1), "Y");
    assert!(engine.substitution().is_identity());
}

#[test]
fn derived_views_follow_their_toggles() {
    let mut engine = engine();
    assert!(!engine.cell_flags(1, 4).vowel);
    engine.set_toggles(Toggles {
        vowels: true,
        matching_letters: true,
        same_letters_on_hover: true,
        ..Toggles::default()
    });
    // 'A' at display (1,4) is a vowel.
    assert!(engine.cell_flags(1, 4).vowel);
    assert!(!engine.cell_flags(1, 1).vowel);
    // Row 2 has 'I' at position 8 in both halves.
    assert_eq!(engine.display_value(2, 8), "I");
    assert_eq!(engine.display_value(2, 26), "I");
    let flags = engine.cell_flags(2, 8);
    assert!(flags.matching);
    assert!(flags.common);
    // Row 1 position 1: 'Y' vs 'M', and no 'Y' in the right half.
    let flags = engine.cell_flags(1, 1);
    assert!(!flags.matching);
    assert!(!flags.common);
    // Hover marks every cell showing the hovered letter.
    engine.set_hovered(Some('Y'));
    assert!(engine.cell_flags(1, 1).hovered);
    assert!(!engine.cell_flags(1, 2).hovered);
    engine.set_hovered(None);
    assert!(!engine.cell_flags(1, 1).hovered);
}

#[test]
fn export_blanks_hidden_cells_and_groups_by_six() {
    let mut engine = engine();
    engine.set_highlight_mode(HIDE_MODE);
    engine.toggle_cell(1, 1);
    let text = engine.export_text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], " PWAIE TOAENR MHMGEN  MIVWDM KDTCBA NGBFKW");
    assert_eq!(lines[9], "HRFRON LRATTA TTIQAT  ANEUOA SGNHSF ALEHND");
}

#[test]
fn state_round_trips_through_the_store() {
    let mut engine = engine();
    engine.rotate_column(5, -1);
    engine.swap_rows('B', 'J', Side::Left);
    engine.swap_rows('A', 'C', Side::Right);
    engine.swap_cols(3, 7);
    engine.set_highlight_mode(2);
    engine.toggle_cell(4, 12);
    engine.set_substitution('K', SubstitutionInput::Letter('P'));
    engine.set_toggles(Toggles {
        vowels: true,
        substitutions: true,
        ..Toggles::default()
    });

    let restored = GridEngine::new(EngineConfig::default(), engine.store().clone());
    assert_eq!(restored.highlight_mode(), 2);
    assert_eq!(restored.toggles(), engine.toggles());
    assert_eq!(restored.substitution(), engine.substitution());
    assert_eq!(restored.highlights(), engine.highlights());
    for row in 0..=10 {
        for col in 0..=37 {
            assert_eq!(
                restored.display_value(row, col),
                engine.display_value(row, col),
                "display mismatch at ({row},{col})"
            );
            assert_eq!(restored.cell_flags(row, col), engine.cell_flags(row, col));
        }
    }
}

#[test]
fn malformed_records_fall_back_to_defaults() {
    let mut store = MemoryStore::new();
    store.set(keys::HIGHLIGHTS, r#"{"A,3":2,"K,40":1}"#);
    store.set(keys::ROW_ORDER, "[0,1,2,3]");
    store.set(keys::COL_ORDER, "not json");
    store.set(keys::COL_OFFSETS, "[11]");
    let engine = GridEngine::new(EngineConfig::default(), MemoryStore::clone(&store));
    assert!(engine.highlights().is_empty());
    // One bad key poisons the whole map, and the record is dropped.
    assert_eq!(engine.store().get(keys::HIGHLIGHTS), None);
    assert_eq!(engine.display_value(1, 1), "Y");
    assert_eq!(engine.offset(1), 0);
    assert_eq!(engine.row_order(Side::Left), (0..=10).collect::<Vec<_>>());
}

#[test]
fn version_marker_is_refreshed_on_mismatch() {
    let mut store = MemoryStore::new();
    store.set(keys::VERSION, "v0.0.1 / stale");
    store.set(keys::SHOW_VOWELS, "true");
    let engine = GridEngine::new(EngineConfig::default(), store);
    assert_eq!(
        engine.store().get(keys::VERSION).as_deref(),
        Some(VERSION_TEXT)
    );
    // A stale marker does not invalidate other records.
    assert!(engine.toggles().vowels);
}
