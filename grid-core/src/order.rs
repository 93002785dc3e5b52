//! Row and column permutations.

/// A display ordering: `slots[i]` is the canonical index rendered at
/// display slot `i`. Slot 0 (and any slot past `data_max`) holds a
/// header/label pseudo-index that swaps never move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    slots: Vec<usize>,
    data_max: usize,
}

impl Order {
    /// Identity ordering of `len` slots where values `1..=data_max` are
    /// swappable data indices.
    pub fn identity(len: usize, data_max: usize) -> Self {
        Order {
            slots: (0..len).collect(),
            data_max,
        }
    }

    pub fn at(&self, slot: usize) -> usize {
        self.slots[slot]
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    pub fn is_identity(&self) -> bool {
        self.slots.iter().enumerate().all(|(i, &v)| i == v)
    }

    /// Exchange the display positions of the *values* `from` and `to`.
    /// Both are located by scan; out-of-range values are rejected with no
    /// state change. Swapping the same pair twice restores the order.
    pub fn swap(&mut self, from: usize, to: usize) -> bool {
        if from < 1 || from > self.data_max || to < 1 || to > self.data_max {
            return false;
        }
        for slot in self.slots.iter_mut() {
            if *slot == from {
                *slot = to;
            } else if *slot == to {
                *slot = from;
            }
        }
        true
    }

    pub fn reset(&mut self) {
        self.slots = (0..self.slots.len()).collect();
    }

    /// Restore from a persisted sequence: the cardinality must match and
    /// the values must form a permutation of `0..len` with the pseudo
    /// slots still in place.
    pub fn from_vec(values: Vec<usize>, len: usize, data_max: usize) -> Option<Self> {
        if values.len() != len {
            return None;
        }
        let mut seen = vec![false; len];
        for &v in &values {
            if v >= len || seen[v] {
                return None;
            }
            seen[v] = true;
        }
        // Pseudo header/label slots are fixed by construction.
        for (i, &v) in values.iter().enumerate() {
            if (v == 0 || v > data_max) && v != i {
                return None;
            }
        }
        Some(Order {
            slots: values,
            data_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_exchanges_values_not_slots() {
        let mut order = Order::identity(37, 36);
        order.swap(3, 7);
        order.swap(7, 20);
        // Value 3 sits where 7 started, 7 moved on to slot 20.
        assert_eq!(order.at(7), 3);
        assert_eq!(order.at(20), 7);
        assert_eq!(order.at(3), 20);
    }

    #[test]
    fn swap_is_self_inverse() {
        let mut order = Order::identity(11, 10);
        let original = order.clone();
        assert!(order.swap(2, 9));
        assert!(order.swap(2, 9));
        assert_eq!(order, original);
    }

    #[test]
    fn out_of_range_swaps_are_rejected() {
        let mut order = Order::identity(37, 36);
        let original = order.clone();
        assert!(!order.swap(0, 5));
        assert!(!order.swap(5, 37));
        assert!(!order.swap(40, 41));
        assert_eq!(order, original);
    }

    #[test]
    fn reset_restores_identity() {
        let mut order = Order::identity(11, 10);
        order.swap(1, 10);
        order.swap(4, 5);
        assert!(!order.is_identity());
        order.reset();
        assert!(order.is_identity());
    }

    #[test]
    fn restore_validates_the_permutation() {
        assert!(Order::from_vec((0..11).collect(), 11, 10).is_some());
        // Wrong cardinality.
        assert!(Order::from_vec((0..10).collect(), 11, 10).is_none());
        // Duplicate value.
        assert!(Order::from_vec(vec![0, 1, 1, 3, 4, 5, 6, 7, 8, 9, 10], 11, 10).is_none());
        // Out-of-range value.
        assert!(Order::from_vec(vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 11], 11, 10).is_none());
        // Header slot moved.
        assert!(Order::from_vec(vec![1, 0, 2, 3, 4, 5, 6, 7, 8, 9, 10], 11, 10).is_none());
        // Terminal label slot moved (split-side column order).
        let mut split: Vec<usize> = (0..38).collect();
        split.swap(37, 5);
        assert!(Order::from_vec(split, 38, 36).is_none());
    }
}
