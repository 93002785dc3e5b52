use grid_core::Storage;

/// The engine's persistence port over `window.localStorage`. Every
/// browser-side failure degrades to "record absent" and the engine falls
/// back to its defaults.
pub struct LocalStore {
    inner: Option<web_sys::Storage>,
}

impl LocalStore {
    pub fn from_window(window: &web_sys::Window) -> Self {
        LocalStore {
            inner: window.local_storage().ok().flatten(),
        }
    }
}

impl Storage for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.inner {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = &self.inner {
            let _ = storage.remove_item(key);
        }
    }
}
