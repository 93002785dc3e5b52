//! The persistence port and JSON record helpers.
//!
//! Storage is injected (localStorage in the browser, an in-memory map in
//! tests) so the engine never touches a global store directly.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key-value persistence port, shaped like the browser's localStorage.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and headless use.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.map.remove(key);
    }
}

/// Read and parse one JSON record; a missing or unparsable record is
/// `None` and the caller falls back to its default.
pub fn load_json<S: Storage, T: DeserializeOwned>(store: &S, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    serde_json::from_str(&raw).ok()
}

pub fn save_json<S: Storage, T: Serialize>(store: &mut S, key: &str, value: &T) {
    if let Ok(raw) = serde_json::to_string(value) {
        store.set(key, &raw);
    }
}
