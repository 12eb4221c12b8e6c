//! Cell control generation.
//!
//! Turns a column spec into the concrete `<input>` element holding a
//! cell's value. Custom columns are built by their configured builder and
//! never pass through here.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

use crate::types::{ColumnKind, ColumnSpec};

/// Generate the control for one cell, or `None` for kinds that own no
/// generated control.
pub(crate) fn generate(
    document: &Document,
    spec: &ColumnSpec,
    ctrl_id: &str,
    ctrl_name: &str,
) -> Option<Element> {
    let input_type = match spec.kind {
        ColumnKind::Text => "text",
        ColumnKind::Checkbox => "checkbox",
        ColumnKind::Hidden => "hidden",
        ColumnKind::Custom => return None,
    };

    let element = document.create_element("input").ok()?;
    let input = element.dyn_into::<HtmlInputElement>().ok()?;
    input.set_type(input_type);
    input.set_id(ctrl_id);
    input.set_name(ctrl_name);
    for (attr, value) in &spec.ctrl_attrs {
        let _ = input.set_attribute(attr, value);
    }
    Some(input.into())
}
