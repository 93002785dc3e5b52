//! Browser front end for the grid engine: renders the current display
//! matrix as an HTML table and forwards clicks, hovers and host-page
//! button presses to engine commands. All real logic lives in
//! `grid-core`; this crate is glue.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event};

use grid_core::{COLS, EngineConfig, GridEngine, HALF, Layout, ROWS, Side, SubstitutionInput};

mod local_storage;
mod state;
mod utils;

use local_storage::LocalStore;
use state::{STATE, State};
use utils::{get_query_param, log};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let store = LocalStore::from_window(&window);
    let engine = GridEngine::new(engine_config(&window), store);
    let state = Rc::new(RefCell::new(State {
        window,
        document,
        engine,
    }));
    STATE.with(|s| *s.borrow_mut() = Some(state.clone()));
    render(&state.borrow());
    attach_grid_listeners(&state)?;
    log("grid ready");
    Ok(())
}

// `?layout=single` selects the one-row-order layout; the split-side grid
// is the default.
fn engine_config(window: &web_sys::Window) -> EngineConfig {
    let search = window.location().search().unwrap_or_default();
    let layout = match get_query_param(&search, "layout").as_deref() {
        Some("single") => Layout::Single,
        _ => Layout::Split,
    };
    EngineConfig {
        layout,
        ..EngineConfig::default()
    }
}

fn with_state<R>(f: impl FnOnce(&mut State) -> R) -> Option<R> {
    STATE.with(|s| {
        let rc = s.borrow().clone()?;
        let mut state = rc.borrow_mut();
        Some(f(&mut state))
    })
}

fn render(state: &State) {
    if let Some(grid) = state.document.get_element_by_id("grid") {
        grid.set_inner_html(&table_html(&state.engine));
    }
}

fn attach_grid_listeners(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let Some(grid) = state.borrow().document.get_element_by_id("grid") else {
        return Ok(());
    };

    let st = state.clone();
    let onclick = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        let Some(td) = event_cell(&e) else { return };
        let action = td.get_attribute("data-action").unwrap_or_default();
        let row = attr_number(&td, "data-row");
        let col = attr_number(&td, "data-col");
        let mut s = st.borrow_mut();
        let changed = match (action.as_str(), row, col) {
            ("cell", Some(r), Some(c)) => s.engine.toggle_cell(r, c),
            ("offset", _, Some(c)) => s.engine.reset_column_offset(c),
            ("up", _, Some(c)) => s.engine.rotate_column(c, -1),
            ("down", _, Some(c)) => s.engine.rotate_column(c, 1),
            _ => false,
        };
        if changed {
            render(&s);
        }
    }));
    grid.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();

    let st = state.clone();
    let onhover = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        let letter = event_cell(&e)
            .and_then(|td| td.get_attribute("data-letter"))
            .and_then(|v| v.chars().next());
        let mut s = st.borrow_mut();
        if letter != s.engine.hovered() {
            s.engine.set_hovered(letter);
            if s.engine.toggles().same_letters_on_hover {
                render(&s);
            }
        }
    }));
    grid.add_event_listener_with_callback("mouseover", onhover.as_ref().unchecked_ref())?;
    onhover.forget();
    Ok(())
}

fn event_cell(e: &Event) -> Option<Element> {
    let el: Element = e.target()?.dyn_into().ok()?;
    el.closest("td").ok().flatten()
}

fn attr_number(el: &Element, name: &str) -> Option<usize> {
    el.get_attribute(name).and_then(|v| v.parse().ok())
}

fn table_html(engine: &GridEngine<LocalStore>) -> String {
    let col_slots = engine.col_order().len();
    let mut s = String::new();
    s.push_str("<table><thead><tr>");
    // Offset header: shows how far each column is shifted, click resets.
    for slot in 0..col_slots {
        let col = engine.col_order()[slot];
        if (1..=COLS).contains(&col) {
            let label = engine.offset_label(col);
            let faded = if label == 0 { " offset-faded" } else { "" };
            s.push_str(&format!(
                "<td class=\"arrow-cell{faded}\" data-action=\"offset\" data-col=\"{col}\">{label}</td>"
            ));
        } else {
            s.push_str("<td></td>");
        }
    }
    s.push_str("</tr><tr>");
    for slot in 0..col_slots {
        let col = engine.col_order()[slot];
        if (1..=COLS).contains(&col) {
            s.push_str(&format!(
                "<td class=\"border-bottom-bold arrow-cell\" data-action=\"up\" data-col=\"{col}\">&#8593;</td>"
            ));
        } else {
            s.push_str("<td class=\"border-bottom-bold\"></td>");
        }
    }
    s.push_str("</tr></thead><tbody>");
    for row_slot in 0..=ROWS {
        s.push_str("<tr>");
        for col_slot in 0..col_slots {
            s.push_str(&cell_html(engine, row_slot, col_slot));
        }
        s.push_str("</tr>");
    }
    s.push_str("</tbody><tfoot><tr>");
    for slot in 0..col_slots {
        let col = engine.col_order()[slot];
        if (1..=COLS).contains(&col) {
            s.push_str(&format!(
                "<td class=\"border-top-bold arrow-cell\" data-action=\"down\" data-col=\"{col}\">&#8595;</td>"
            ));
        } else {
            s.push_str("<td class=\"border-top-bold\"></td>");
        }
    }
    s.push_str("</tr></tfoot></table>");
    s
}

fn cell_html(engine: &GridEngine<LocalStore>, row_slot: usize, col_slot: usize) -> String {
    let value = engine.display_value(row_slot, col_slot);
    let classes = cell_classes(engine, row_slot, col_slot);
    match engine.display_letter(row_slot, col_slot) {
        Some(letter) => format!(
            "<td class=\"{classes}\" data-action=\"cell\" data-row=\"{row_slot}\" data-col=\"{col_slot}\" data-letter=\"{letter}\">{value}</td>"
        ),
        None => format!("<td class=\"{classes}\">{value}</td>"),
    }
}

fn cell_classes(engine: &GridEngine<LocalStore>, row_slot: usize, col_slot: usize) -> String {
    let last_slot = engine.col_order().len() - 1;
    let label_col = col_slot == 0 || (engine.config().layout == Layout::Split && col_slot == last_slot);
    let mut classes: Vec<String> = Vec::new();
    if row_slot == 0 || label_col {
        classes.push("bold".to_string());
        // Flag header/label cells whose value moved away from home.
        let moved = if row_slot == 0 {
            engine.col_order()[col_slot] != col_slot
        } else {
            let side = if col_slot == 0 { Side::Left } else { Side::Right };
            engine.row_order(side)[row_slot] != row_slot
        };
        if moved {
            classes.push("cell-changed".to_string());
        }
    }
    if row_slot == 0 {
        classes.push("border-bottom-bold".to_string());
    }
    if col_slot == 0 {
        classes.push("border-right-bold".to_string());
    }
    if col_slot == HALF + 1 {
        classes.push("border-left-bold".to_string());
    }
    let flags = engine.cell_flags(row_slot, col_slot);
    if let Some(mode) = flags.mode {
        classes.push(format!("highlight-{}", mode + 1));
    }
    if flags.hidden {
        classes.push("hidden".to_string());
    }
    if flags.vowel {
        classes.push("vowel".to_string());
    }
    if flags.matching {
        classes.push("matching".to_string());
    }
    if flags.common {
        classes.push("common".to_string());
    }
    if flags.hovered {
        classes.push("hover-match".to_string());
    }
    classes.join(" ")
}

// ---- host page commands ---------------------------------------------

#[wasm_bindgen]
pub fn swap_rows(from: &str, to: &str, side: &str) -> bool {
    let (Some(from), Some(to)) = (first_letter(from), first_letter(to)) else {
        return false;
    };
    let side = if side.eq_ignore_ascii_case("right") {
        Side::Right
    } else {
        Side::Left
    };
    rerender_if(|state| state.engine.swap_rows(from, to, side))
}

#[wasm_bindgen]
pub fn swap_cols(from: usize, to: usize) -> bool {
    rerender_if(|state| state.engine.swap_cols(from, to))
}

#[wasm_bindgen]
pub fn set_highlight_mode(mode: u8) -> bool {
    with_state(|state| state.engine.set_highlight_mode(mode)).unwrap_or(false)
}

/// An empty `value` erases the substitution for `letter`.
#[wasm_bindgen]
pub fn set_substitution(letter: &str, value: &str) -> bool {
    let Some(letter) = first_letter(letter) else {
        return false;
    };
    let input = match first_letter(value) {
        Some(target) => SubstitutionInput::Letter(target),
        None if value.trim().is_empty() => SubstitutionInput::Erase,
        None => return false,
    };
    rerender_if(|state| state.engine.set_substitution(letter, input))
}

#[wasm_bindgen]
pub fn set_option(name: &str, enabled: bool) -> bool {
    rerender_if(|state| {
        let mut toggles = state.engine.toggles();
        match name {
            "showSameLettersOnHover" => toggles.same_letters_on_hover = enabled,
            "showMatchingLetters" => toggles.matching_letters = enabled,
            "showVowels" => toggles.vowels = enabled,
            "showSubstitutions" => toggles.substitutions = enabled,
            "highlightSameLettersWhenClicked" => {
                toggles.highlight_same_letters_when_clicked = enabled
            }
            _ => return false,
        }
        state.engine.set_toggles(toggles);
        true
    })
}

#[wasm_bindgen]
pub fn reset(scope: &str) -> bool {
    rerender_if(|state| {
        match scope {
            "rows" => state.engine.reset_rows(),
            "cols" => state.engine.reset_cols(),
            "highlights" => state.engine.reset_highlights(),
            "offsets" => state.engine.reset_offsets(),
            "substitutions" => state.engine.reset_substitutions(),
            "all" => state.engine.reset_all(),
            _ => return false,
        }
        true
    })
}

/// The display matrix as plain text, for the host page's copy button.
#[wasm_bindgen]
pub fn export_text() -> String {
    with_state(|state| state.engine.export_text()).unwrap_or_default()
}

fn first_letter(s: &str) -> Option<char> {
    let c = s.trim().chars().next()?;
    let c = c.to_ascii_uppercase();
    c.is_ascii_uppercase().then_some(c)
}

fn rerender_if(f: impl FnOnce(&mut State) -> bool) -> bool {
    with_state(|state| {
        let changed = f(state);
        if changed {
            render(state);
        }
        changed
    })
    .unwrap_or(false)
}
