//! Grid transform and annotation engine for the fixed 10x36 letter
//! matrix.
//!
//! The canonical matrix never changes; what the user sees is derived
//! through three layers (per-column rotation, row/column permutation,
//! substitution cipher) while annotations stay keyed to canonical cell
//! identities, so no amount of rearranging loses or misattributes a
//! marking. State persists through an injected key-value port after
//! every mutation.

pub mod constants;
pub mod coords;
pub mod engine;
pub mod highlights;
pub mod matrix;
pub mod order;
pub mod storage;
pub mod substitution;

pub use constants::{COLS, HALF, HIDE_MODE, MODE_COUNT, ROWS, VERSION_TEXT};
pub use coords::CellKey;
pub use engine::{CellFlags, EngineConfig, GridEngine, Layout, Side, Toggles};
pub use highlights::HighlightMap;
pub use matrix::{CanonicalMatrix, ColOffsets};
pub use order::Order;
pub use storage::{MemoryStore, Storage};
pub use substitution::{Substitution, SubstitutionInput};
