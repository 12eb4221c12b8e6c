//! DOM rendering bridge.
//!
//! Materializes rows as `<tr>` elements inside the grid's tbody, generates
//! cell controls per column, and wires the per-row action buttons to the
//! engine's dispatcher with an explicit `(action, identity)` payload; no
//! dataset attributes carry state.
//!
//! Element-id scheme (all lookups go through it):
//! - row: `{prefix}_Row_{id}`
//! - row number cell: `{prefix}_RowNum_{id}`
//! - control: `{prefix}_{column}_{id}`
//! - action button: `{prefix}_${action}_{id}`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use super::{controls, row_id_to_js};
use crate::bridge::{CellControl, RenderBridge};
use crate::types::{ColumnKind, ColumnSpec, HideButtons, RowAction, RowId};

/// Shared slot for the engine's `(action, identity)` dispatcher. Filled in
/// after the engine exists; buttons created before that are inert.
pub(crate) type Dispatcher = Rc<RefCell<Option<Box<dyn Fn(RowAction, RowId)>>>>;

/// Resolves the form name of a control: `(column, identity) -> name`.
pub(crate) type NameResolver = Rc<dyn Fn(&str, RowId) -> String>;

pub(crate) struct DomBridge {
    document: Document,
    tbody: Element,
    columns: Vec<ColumnSpec>,
    custom_builders: HashMap<String, js_sys::Function>,
    id_prefix: String,
    hide_row_num_column: bool,
    row_buttons_in_front: bool,
    hide_buttons: HideButtons,
    name_for: NameResolver,
    dispatcher: Dispatcher,
    click_closures: HashMap<String, Vec<Closure<dyn FnMut(web_sys::Event)>>>,
    // Closures whose row was removed. A removed row's button closure can
    // still be on the stack (the removal ran from its own click), so these
    // are only dropped with the bridge.
    retired_closures: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

impl DomBridge {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        document: Document,
        tbody: Element,
        columns: Vec<ColumnSpec>,
        custom_builders: HashMap<String, js_sys::Function>,
        id_prefix: String,
        hide_row_num_column: bool,
        row_buttons_in_front: bool,
        hide_buttons: HideButtons,
        name_for: NameResolver,
        dispatcher: Dispatcher,
    ) -> Self {
        DomBridge {
            document,
            tbody,
            columns,
            custom_builders,
            id_prefix,
            hide_row_num_column,
            row_buttons_in_front,
            hide_buttons,
            name_for,
            dispatcher,
            click_closures: HashMap::new(),
            retired_closures: Vec::new(),
        }
    }

    /// Create an element for a static tag name.
    #[allow(clippy::expect_used)]
    fn make(&self, tag: &str) -> Element {
        // Static tag names cannot fail to create.
        self.document.create_element(tag).expect("create_element")
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn nth_child(parent: &Element, index: usize) -> Option<Element> {
        u32::try_from(index)
            .ok()
            .and_then(|i| parent.children().item(i))
    }

    fn add_button(&mut self, container: &Element, action: RowAction, id: RowId) {
        let button = self.make("button");
        button.set_id(&format!("{}_${}_{}", self.id_prefix, action.as_str(), id));
        let _ = button.set_attribute("type", "button");
        let _ = button.set_attribute("tabindex", "-1");
        button.set_text_content(Some(action.as_str()));

        let dispatcher = Rc::clone(&self.dispatcher);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            let handler = dispatcher.borrow();
            if let Some(handler) = handler.as_ref() {
                handler(action, id);
            }
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        self.click_closures
            .entry(format!("{}_Row_{}", self.id_prefix, id))
            .or_default()
            .push(closure);

        let _ = container.append_child(&button);
    }
}

impl RenderBridge for DomBridge {
    type Handle = Element;

    fn create_row_visual(&mut self, id: RowId, position: Option<usize>) -> Self::Handle {
        let row = self.make("tr");
        row.set_id(&format!("{}_Row_{}", self.id_prefix, id));

        let child_count = self.tbody.children().length() as usize;
        let at = position.filter(|&p| p < child_count);
        match at.and_then(|p| Self::nth_child(&self.tbody, p)) {
            Some(reference) => {
                let _ = self.tbody.insert_before(&row, Some(&reference));
            }
            None => {
                let _ = self.tbody.append_child(&row);
            }
        }

        // Row number cell; positional inserts are resynced by the engine
        // right after, so the creation-time rank only has to be right for
        // appends.
        if !self.hide_row_num_column {
            let cell = self.make("td");
            cell.set_id(&format!("{}_RowNum_{}", self.id_prefix, id));
            let rank = at.unwrap_or(child_count) + 1;
            cell.set_text_content(Some(&rank.to_string()));
            let _ = row.append_child(&cell);
        }

        // Data cells in schema order; hidden columns are materialized as
        // hidden inputs in the action cell below.
        let mut hidden_columns = Vec::new();
        for spec in &self.columns {
            if spec.kind == ColumnKind::Hidden {
                hidden_columns.push(spec.clone());
                continue;
            }
            let cell = self.make("td");
            cell.set_id(&format!("{}_{}_td_{}", self.id_prefix, spec.name, id));
            let _ = row.append_child(&cell);

            if spec.kind == ColumnKind::Custom {
                if let Some(builder) = self.custom_builders.get(&spec.name) {
                    let args = js_sys::Array::of4(
                        &JsValue::from(cell),
                        &JsValue::from_str(&self.id_prefix),
                        &JsValue::from_str(&spec.name),
                        &JsValue::from(row_id_to_js(id)),
                    );
                    let _ = builder.apply(&JsValue::NULL, &args);
                }
                continue;
            }

            let ctrl_id = format!("{}_{}_{}", self.id_prefix, spec.name, id);
            let ctrl_name = (self.name_for)(&spec.name, id);
            if let Some(control) = controls::generate(&self.document, spec, &ctrl_id, &ctrl_name) {
                let _ = cell.append_child(&control);
            }
        }

        // Action cell: row buttons plus hidden controls.
        if !self.hide_buttons.all_hidden() || !hidden_columns.is_empty() {
            let cell = self.make("td");
            cell.set_id(&format!("{}_last_td_{}", self.id_prefix, id));
            if self.row_buttons_in_front {
                let skip = usize::from(!self.hide_row_num_column);
                match Self::nth_child(&row, skip) {
                    Some(reference) => {
                        let _ = row.insert_before(&cell, Some(&reference));
                    }
                    None => {
                        let _ = row.append_child(&cell);
                    }
                }
            } else {
                let _ = row.append_child(&cell);
            }

            for action in RowAction::all() {
                if !self.hide_buttons.hides(action) {
                    self.add_button(&cell, action, id);
                }
            }

            for spec in &hidden_columns {
                let ctrl_id = format!("{}_{}_{}", self.id_prefix, spec.name, id);
                let ctrl_name = (self.name_for)(&spec.name, id);
                if let Some(control) =
                    controls::generate(&self.document, spec, &ctrl_id, &ctrl_name)
                {
                    let _ = cell.append_child(&control);
                }
            }
        }

        row
    }

    fn remove_row_visual(&mut self, handle: &Self::Handle) {
        if let Some(mut closures) = self.click_closures.remove(&handle.id()) {
            self.retired_closures.append(&mut closures);
        }
        handle.remove();
    }

    fn move_row_visual(&mut self, handle: &Self::Handle, before: Option<&Self::Handle>) {
        // insert_before with an attached node relocates it.
        match before {
            Some(reference) => {
                let _ = self.tbody.insert_before(handle, Some(reference));
            }
            None => {
                let _ = self.tbody.append_child(handle);
            }
        }
    }

    fn set_rank_label(&mut self, id: RowId, rank: usize) {
        if let Some(cell) = self.element_by_id(&format!("{}_RowNum_{}", self.id_prefix, id)) {
            cell.set_text_content(Some(&rank.to_string()));
        }
    }

    fn locate_control(&self, column: &str, id: RowId) -> Option<Rc<dyn CellControl>> {
        let element = self.element_by_id(&format!("{}_{}_{}", self.id_prefix, column, id))?;
        // Only generated inputs are addressable; custom-built content is
        // reached through the column's accessors instead.
        let input = element.dyn_into::<HtmlInputElement>().ok()?;
        Some(Rc::new(DomControl { input }))
    }

    fn shift_move_focus(&mut self, action: RowAction, from: RowId, to: RowId) {
        let button_id = |id: RowId| format!("{}_${}_{}", self.id_prefix, action.as_str(), id);
        if let Some(element) = self.element_by_id(&button_id(from)) {
            if let Some(button) = element.dyn_ref::<HtmlElement>() {
                let _ = button.blur();
            }
        }
        if let Some(element) = self.element_by_id(&button_id(to)) {
            if let Some(button) = element.dyn_ref::<HtmlElement>() {
                let _ = button.focus();
            }
        }
    }
}

/// A generated `<input>` control.
pub(crate) struct DomControl {
    input: HtmlInputElement,
}

impl CellControl for DomControl {
    fn value(&self) -> String {
        self.input.value()
    }

    fn set_value(&self, value: &str) {
        self.input.set_value(value);
    }

    fn is_checked(&self) -> bool {
        self.input.checked()
    }

    fn set_checked(&self, checked: bool) {
        self.input.set_checked(checked);
    }

    fn focus(&self) {
        let _ = self.input.focus();
    }

    fn blur(&self) {
        let _ = self.input.blur();
    }
}
