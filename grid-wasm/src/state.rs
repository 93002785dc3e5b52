use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Document, Window};

use grid_core::GridEngine;

use crate::local_storage::LocalStore;

/// Global application state stored behind an `Rc<RefCell<_>>` so it can
/// be shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub engine: GridEngine<LocalStore>,
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
