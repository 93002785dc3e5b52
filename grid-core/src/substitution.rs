//! The user-editable letter substitution, a display-only transform.

use std::collections::HashMap;

/// What the user entered into a substitution slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubstitutionInput {
    Letter(char),
    Erase,
}

/// Letter-to-letter display remapping. Starts as the identity and need
/// not stay a bijection: two letters may map to the same target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Substitution {
    map: [char; 26],
}

impl Substitution {
    pub fn identity() -> Self {
        let mut map = [' '; 26];
        for (i, slot) in map.iter_mut().enumerate() {
            *slot = (b'A' + i as u8) as char;
        }
        Substitution { map }
    }

    fn index(letter: char) -> Option<usize> {
        if letter.is_ascii_uppercase() {
            Some(letter as usize - 'A' as usize)
        } else {
            None
        }
    }

    /// Set or erase one letter's mapping. Any input that is neither a
    /// letter nor an erase is rejected without mutation.
    pub fn set(&mut self, letter: char, input: SubstitutionInput) -> bool {
        let Some(i) = Self::index(letter) else {
            return false;
        };
        match input {
            SubstitutionInput::Letter(target) if target.is_ascii_uppercase() => {
                self.map[i] = target;
                true
            }
            SubstitutionInput::Erase => {
                self.map[i] = letter;
                true
            }
            SubstitutionInput::Letter(_) => false,
        }
    }

    pub fn apply(&self, letter: char) -> char {
        match Self::index(letter) {
            Some(i) => self.map[i],
            None => letter,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.map
            .iter()
            .enumerate()
            .all(|(i, &v)| v == (b'A' + i as u8) as char)
    }

    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    /// The edited entries, for persistence.
    pub fn entries(&self) -> HashMap<char, char> {
        self.map
            .iter()
            .enumerate()
            .filter(|&(i, &v)| v != (b'A' + i as u8) as char)
            .map(|(i, &v)| ((b'A' + i as u8) as char, v))
            .collect()
    }

    /// Restore from a persisted map. Any letter-to-letter pair is
    /// structurally valid; other entries are dropped.
    pub fn from_entries(entries: &HashMap<char, char>) -> Self {
        let mut sub = Self::identity();
        for (&letter, &target) in entries {
            if target.is_ascii_uppercase() {
                sub.set(letter, SubstitutionInput::Letter(target));
            }
        }
        sub
    }
}

impl Default for Substitution {
    fn default() -> Self {
        Self::identity()
    }
}
