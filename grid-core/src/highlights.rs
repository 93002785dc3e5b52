//! The annotation store: highlight-mode tags keyed by canonical cell.

use std::collections::HashMap;

use crate::constants::HIDE_MODE;
use crate::coords::CellKey;

/// Map from canonical cell to its highlight mode. A cell carries at most
/// one mode; the reserved [`HIDE_MODE`] is just another slot, mutually
/// exclusive with colored modes. Absence means unannotated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightMap {
    cells: HashMap<CellKey, u8>,
}

impl HighlightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: CellKey) -> Option<u8> {
        self.cells.get(&key).copied()
    }

    pub fn is_hidden(&self, key: CellKey) -> bool {
        self.get(key) == Some(HIDE_MODE)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Toggle one cell: the same mode clears the entry, any other mode
    /// overwrites whatever was there.
    pub fn toggle(&mut self, key: CellKey, mode: u8) {
        if self.cells.get(&key) == Some(&mode) {
            self.cells.remove(&key);
        } else {
            self.cells.insert(key, mode);
        }
    }

    /// Toggle a group as a unit: if every key already carries `mode` the
    /// group is cleared, otherwise all of them are set to `mode`.
    pub fn toggle_group(&mut self, keys: &[CellKey], mode: u8) {
        let all_set = !keys.is_empty() && keys.iter().all(|&k| self.get(k) == Some(mode));
        for &key in keys {
            if all_set {
                self.cells.remove(&key);
            } else {
                self.cells.insert(key, mode);
            }
        }
    }

    pub fn reset(&mut self) {
        self.cells.clear();
    }

    pub fn encode(&self) -> String {
        let map: HashMap<String, u8> = self
            .cells
            .iter()
            .map(|(k, &m)| (k.encode(), m))
            .collect();
        serde_json::to_string(&map).unwrap_or_else(|_| "{}".to_string())
    }

    /// Restore from a persisted record. All-or-nothing: a single invalid
    /// key or value discards the entire map.
    pub fn decode(stored: &str) -> Option<HighlightMap> {
        let map: HashMap<String, u8> = serde_json::from_str(stored).ok()?;
        let mut cells = HashMap::with_capacity(map.len());
        for (encoded, mode) in map {
            let key = CellKey::parse(&encoded)?;
            cells.insert(key, mode);
        }
        Some(HighlightMap { cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(row: char, col: usize) -> CellKey {
        CellKey::new(row, col)
    }

    #[test]
    fn toggling_twice_restores_prior_state() {
        let mut map = HighlightMap::new();
        map.toggle(key('B', 4), 2);
        assert_eq!(map.get(key('B', 4)), Some(2));
        map.toggle(key('B', 4), 2);
        assert_eq!(map.get(key('B', 4)), None);
        assert!(map.is_empty());
    }

    #[test]
    fn a_cell_holds_one_mode_at_a_time() {
        let mut map = HighlightMap::new();
        map.toggle(key('B', 4), 2);
        map.toggle(key('B', 4), 3);
        assert_eq!(map.get(key('B', 4)), Some(3));
        // Hide replaces the colored mode rather than stacking.
        map.toggle(key('B', 4), HIDE_MODE);
        assert_eq!(map.get(key('B', 4)), Some(HIDE_MODE));
        assert!(map.is_hidden(key('B', 4)));
    }

    #[test]
    fn group_toggle_sets_then_clears() {
        let keys = vec![key('A', 1), key('C', 9), key('J', 36)];
        let mut map = HighlightMap::new();
        map.toggle(keys[1], 7); // one pre-set with the same mode
        map.toggle_group(&keys, 7);
        assert!(keys.iter().all(|&k| map.get(k) == Some(7)));
        map.toggle_group(&keys, 7);
        assert!(keys.iter().all(|&k| map.get(k).is_none()));
    }

    #[test]
    fn group_toggle_overwrites_mixed_modes() {
        let keys = vec![key('A', 1), key('A', 2)];
        let mut map = HighlightMap::new();
        map.toggle(keys[0], 1);
        map.toggle_group(&keys, 4);
        assert!(keys.iter().all(|&k| map.get(k) == Some(4)));
    }

    #[test]
    fn decode_discards_the_whole_map_on_a_bad_entry() {
        assert!(HighlightMap::decode(r#"{"A,3":2,"B,17":5}"#).is_some());
        assert!(HighlightMap::decode(r#"{"A,3":2,"K,17":5}"#).is_none());
        assert!(HighlightMap::decode(r#"{"A,3":-1}"#).is_none());
        assert!(HighlightMap::decode("not json").is_none());
    }

    #[test]
    fn encode_decode_round_trips() {
        let mut map = HighlightMap::new();
        map.toggle(key('A', 3), 2);
        map.toggle(key('J', 36), HIDE_MODE);
        assert_eq!(HighlightMap::decode(&map.encode()), Some(map));
    }
}
