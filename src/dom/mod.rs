//! DOM attachment and the `RowGrid` struct exported to JavaScript.
//!
//! Attaches a grid to an existing `<table>` element:
//! - builds the thead/tbody/tfoot skeleton and footer buttons
//! - parses the JS options object into a [`GridConfig`]
//! - wraps JS callbacks (custom accessors, name formatter, remove veto)
//! - exposes the operation surface with JS-friendly conversions
//!
//! All state lives in an `Rc<RefCell<GridCore<DomBridge>>>`; button click
//! closures reach it through a shared dispatcher slot so no DOM attribute
//! ever stores grid state.

mod bridge;
mod controls;

use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Array, Function};
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlTableElement};

use self::bridge::{Dispatcher, DomBridge, NameResolver};

use crate::engine::{GridCore, InsertResult, InsertSpec, RemoveOutcome};
use crate::error::GridError;
use crate::types::{
    BeforeRowRemove, ColumnKind, ColumnSpec, CustomGetter, CustomSetter, GridConfig, HideButtons,
    NameFormatter, Record, RowId,
};

/// JS passes identities and sizes as plain numbers; both are minted from
/// counters and stay well inside integer-safe range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn row_id_from_js(raw: f64) -> Option<RowId> {
    (raw.is_finite() && raw >= 0.0).then(|| RowId::new(raw as u64))
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn row_id_to_js(id: RowId) -> f64 {
    id.as_u64() as f64
}

#[allow(clippy::cast_precision_loss)]
fn position_to_js(position: usize) -> f64 {
    position as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn usize_from_js(raw: f64) -> Option<usize> {
    (raw.is_finite() && raw >= 0.0).then(|| raw as usize)
}

// ============================================================================
// Options parsing
// ============================================================================

fn get(obj: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn get_bool(obj: &JsValue, key: &str) -> bool {
    get(obj, key).is_some_and(|v| v.is_truthy())
}

fn get_string(obj: &JsValue, key: &str) -> Option<String> {
    get(obj, key).and_then(|v| v.as_string())
}

fn get_function(obj: &JsValue, key: &str) -> Option<Function> {
    get(obj, key).and_then(|v| v.dyn_into::<Function>().ok())
}

fn wrap_getter(f: Function) -> CustomGetter {
    Rc::new(move |prefix, column, id| {
        let args = Array::of3(
            &JsValue::from_str(prefix),
            &JsValue::from_str(column),
            &JsValue::from(row_id_to_js(id)),
        );
        f.apply(&JsValue::NULL, &args)
            .ok()
            .and_then(|ret| serde_wasm_bindgen::from_value(ret).ok())
            .unwrap_or(Value::Null)
    })
}

fn wrap_setter(f: Function) -> CustomSetter {
    Rc::new(move |prefix, column, id, value| {
        let js_value = serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL);
        let args = Array::of4(
            &JsValue::from_str(prefix),
            &JsValue::from_str(column),
            &JsValue::from(row_id_to_js(id)),
            &js_value,
        );
        let _ = f.apply(&JsValue::NULL, &args);
    })
}

fn wrap_name_formatter(f: Function) -> NameFormatter {
    Rc::new(move |prefix, column, id| {
        let args = Array::of3(
            &JsValue::from_str(prefix),
            &JsValue::from_str(column),
            &JsValue::from(row_id_to_js(id)),
        );
        f.apply(&JsValue::NULL, &args)
            .ok()
            .and_then(|ret| ret.as_string())
            .unwrap_or_else(|| format!("{prefix}_{column}_{id}"))
    })
}

fn wrap_veto(f: Function) -> BeforeRowRemove {
    Rc::new(move |id, position| {
        let args = Array::of2(
            &JsValue::from(row_id_to_js(id)),
            &JsValue::from(position_to_js(position)),
        );
        // A throwing hook aborts the removal, like an uncaught veto.
        f.apply(&JsValue::NULL, &args)
            .map(|ret| ret.is_truthy())
            .unwrap_or(false)
    })
}

fn parse_column(value: &JsValue) -> Result<(ColumnSpec, Option<Function>), JsValue> {
    let name = get_string(value, "name").ok_or_else(|| {
        JsValue::from(GridError::InvalidConfiguration(
            "column without a name".to_string(),
        ))
    })?;
    let display = get_string(value, "display").unwrap_or_default();
    let kind = match get_string(value, "type").as_deref() {
        None | Some("text") => ColumnKind::Text,
        Some("checkbox") => ColumnKind::Checkbox,
        Some("hidden") => ColumnKind::Hidden,
        Some("custom") => ColumnKind::Custom,
        Some(other) => {
            return Err(JsValue::from(GridError::InvalidConfiguration(format!(
                "unknown column type `{other}`"
            ))))
        }
    };

    let mut spec = ColumnSpec::new(&name, &display);
    spec.kind = kind;
    if let Some(default) = get(value, "value") {
        spec.default_value = serde_wasm_bindgen::from_value(default).ok();
    }
    if let Some(attrs) = get(value, "ctrlAttr").and_then(|v| v.dyn_into::<js_sys::Object>().ok()) {
        for entry in js_sys::Object::entries(&attrs).iter() {
            let pair = Array::from(&entry);
            if let (Some(attr), Some(attr_value)) =
                (pair.get(0).as_string(), pair.get(1).as_string())
            {
                spec.ctrl_attrs.push((attr, attr_value));
            }
        }
    }
    if let Some(f) = get_function(value, "customGetter") {
        spec.custom_getter = Some(wrap_getter(f));
    }
    if let Some(f) = get_function(value, "customSetter") {
        spec.custom_setter = Some(wrap_setter(f));
    }
    let builder = get_function(value, "customBuilder");
    Ok((spec, builder))
}

struct ParsedOptions {
    config: GridConfig,
    custom_builders: HashMap<String, Function>,
}

fn parse_options(options: &JsValue, table: &HtmlTableElement) -> Result<ParsedOptions, JsValue> {
    let columns_value = get(options, "columns").ok_or_else(|| {
        JsValue::from(GridError::InvalidConfiguration(
            "`columns` is not defined".to_string(),
        ))
    })?;
    let columns_array: Array = columns_value
        .dyn_into()
        .map_err(|_| {
            JsValue::from(GridError::InvalidConfiguration(
                "`columns` is not an array".to_string(),
            ))
        })?;

    let mut columns = Vec::new();
    let mut custom_builders = HashMap::new();
    for entry in columns_array.iter() {
        let (spec, builder) = parse_column(&entry)?;
        if let Some(builder) = builder {
            custom_builders.insert(spec.name.clone(), builder);
        }
        columns.push(spec);
    }

    // Derive the id prefix: explicit option, else the table's own id.
    let id_prefix = get_string(options, "idPrefix")
        .or_else(|| Some(table.id()).filter(|id| !id.is_empty()))
        .unwrap_or_else(|| "rg".to_string());

    let mut config = GridConfig::new(columns);
    config.id_prefix = id_prefix;
    if let Some(init_rows) = get(options, "initRows")
        .and_then(|v| v.as_f64())
        .and_then(usize_from_js)
    {
        config.init_rows = init_rows;
    }
    if let Some(init_data) = get(options, "initData") {
        config.init_data = serde_wasm_bindgen::from_value::<Vec<Record>>(init_data).ok();
    }
    config.hide_row_num_column = get_bool(options, "hideRowNumColumn");
    config.row_buttons_in_front = get_bool(options, "rowButtonsInFront");
    if let Some(hide) = get(options, "hideButtons") {
        config.hide_buttons =
            serde_wasm_bindgen::from_value::<HideButtons>(hide).unwrap_or_default();
    }
    config.name_formatter = get_function(options, "nameFormatter").map(wrap_name_formatter);
    config.before_row_remove = get_function(options, "beforeRowRemove").map(wrap_veto);

    Ok(ParsedOptions {
        config,
        custom_builders,
    })
}

// ============================================================================
// Table skeleton
// ============================================================================

/// Build thead/tbody/tfoot inside the attached table. Returns the tbody
/// (row container) and the tfoot cell that receives the footer buttons.
fn build_skeleton(
    document: &Document,
    table: &HtmlTableElement,
    config: &GridConfig,
) -> Result<(Element, Element), JsValue> {
    table.set_inner_html("");

    let visible = config
        .columns
        .iter()
        .filter(|c| c.kind != ColumnKind::Hidden)
        .count();
    let full_span = visible + 2;

    let thead = document.create_element("thead")?;
    table.append_child(&thead)?;
    let header_row = document.create_element("tr")?;
    thead.append_child(&header_row)?;
    if !config.hide_row_num_column {
        header_row.append_child(&document.create_element("th")?)?;
    }
    for spec in &config.columns {
        if spec.kind == ColumnKind::Hidden {
            continue;
        }
        let cell = document.create_element("th")?;
        cell.set_text_content(Some(&spec.display));
        header_row.append_child(&cell)?;
    }
    header_row.append_child(&document.create_element("th")?)?;

    let tbody = document.create_element("tbody")?;
    table.append_child(&tbody)?;

    let tfoot = document.create_element("tfoot")?;
    table.append_child(&tfoot)?;
    let footer_row = document.create_element("tr")?;
    tfoot.append_child(&footer_row)?;
    let footer_cell = document.create_element("td")?;
    footer_cell.set_attribute("colspan", &full_span.to_string())?;
    footer_row.append_child(&footer_cell)?;

    Ok((tbody, footer_cell))
}

// ============================================================================
// RowGrid
// ============================================================================

type SharedCore = Rc<RefCell<GridCore<DomBridge>>>;

/// The grid struct exported to JavaScript.
///
/// # Usage (JavaScript)
///
/// ```javascript
/// import init, { RowGrid } from 'rowgrid';
/// await init();
/// const grid = new RowGrid(table, {
///   columns: [{ name: 'qty', display: 'Qty' },
///             { name: 'active', display: 'Active', type: 'checkbox' }],
/// });
/// grid.insertRows(2);
/// ```
#[wasm_bindgen]
pub struct RowGrid {
    inner: SharedCore,
    footer_closures: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

#[wasm_bindgen]
impl RowGrid {
    /// Attach a grid to `table` with the given options.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed options object or column schema,
    /// or when `initData` is present but empty.
    #[wasm_bindgen(constructor)]
    pub fn new(table: HtmlTableElement, options: JsValue) -> Result<RowGrid, JsValue> {
        console_error_panic_hook::set_once();
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;

        let parsed = parse_options(&options, &table)?;
        let (tbody, footer_cell) = build_skeleton(&document, &table, &parsed.config)?;

        let dispatcher: Dispatcher = Rc::new(RefCell::new(None));
        let name_for: NameResolver = {
            let prefix = parsed.config.id_prefix.clone();
            match &parsed.config.name_formatter {
                Some(formatter) => {
                    let formatter = Rc::clone(formatter);
                    Rc::new(move |column, id| formatter(&prefix, column, id))
                }
                None => Rc::new(move |column, id| format!("{prefix}_{column}_{id}")),
            }
        };
        let dom_bridge = DomBridge::new(
            document.clone(),
            tbody,
            parsed.config.columns.clone(),
            parsed.custom_builders,
            parsed.config.id_prefix.clone(),
            parsed.config.hide_row_num_column,
            parsed.config.row_buttons_in_front,
            parsed.config.hide_buttons,
            name_for,
            Rc::clone(&dispatcher),
        );

        let core = GridCore::new(parsed.config, dom_bridge)?;
        let inner = Rc::new(RefCell::new(core));

        // Row buttons reach the engine through this single dispatcher.
        let weak = Rc::downgrade(&inner);
        *dispatcher.borrow_mut() = Some(Box::new(move |action, id| {
            if let Some(core) = weak.upgrade() {
                if let Ok(mut core) = core.try_borrow_mut() {
                    let _ = core.dispatch(action, id);
                }
            }
        }));

        let mut grid = RowGrid {
            inner,
            footer_closures: Vec::new(),
        };
        grid.add_footer_button(&document, &footer_cell, "append", |core| {
            let _ = core.insert_rows(InsertSpec::Blank(1), None, None);
        })?;
        grid.add_footer_button(&document, &footer_cell, "removeLast", |core| {
            let _ = core.remove_row(None, None, false);
        })?;

        web_sys::console::debug_1(&JsValue::from_str("rowgrid: initialized"));
        Ok(grid)
    }

    /// Insert rows, optionally before `position` or at the row named by
    /// `anchor`. Pass a number for blank rows or a record array to load.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the argument is neither a count nor a
    /// non-empty record array.
    #[wasm_bindgen(js_name = insertRows)]
    pub fn insert_rows(
        &self,
        count_or_records: JsValue,
        position: Option<usize>,
        anchor: Option<f64>,
    ) -> Result<JsValue, JsValue> {
        let spec = if let Some(count) = count_or_records.as_f64().and_then(usize_from_js) {
            InsertSpec::Blank(count)
        } else {
            let records: Vec<Record> = serde_wasm_bindgen::from_value(count_or_records)
                .map_err(|_| {
                    JsValue::from(GridError::InvalidInput(
                        "expected a row count or a record array".to_string(),
                    ))
                })?;
            InsertSpec::Records(records)
        };
        let anchor = anchor.and_then(row_id_from_js);
        let result = self.lock()?.insert_rows(spec, position, anchor)?;
        insert_result_to_js(&result)
    }

    /// Replace all rows with the given record array.
    ///
    /// # Errors
    ///
    /// Returns an error when `records` is empty or not an array of
    /// objects.
    #[wasm_bindgen(js_name = loadData)]
    pub fn load_data(&self, records: JsValue) -> Result<JsValue, JsValue> {
        let records: Vec<Record> = serde_wasm_bindgen::from_value(records)
            .map_err(|_| JsValue::from(GridError::InvalidInput(
                "records should be a non-empty sequence".to_string(),
            )))?;
        let result = self.lock()?.load_data(records)?;
        insert_result_to_js(&result)
    }

    /// Remove one row; returns `{outcome, id?, position?}`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an explicit position with no live row.
    #[wasm_bindgen(js_name = removeRow)]
    pub fn remove_row(
        &self,
        position: Option<usize>,
        identity: Option<f64>,
        force: Option<bool>,
    ) -> Result<JsValue, JsValue> {
        let identity = identity.and_then(row_id_from_js);
        let outcome = self
            .lock()?
            .remove_row(position, identity, force.unwrap_or(false))?;
        let payload = match outcome {
            RemoveOutcome::Removed { id, position } => serde_json::json!({
                "outcome": "removed",
                "id": row_id_to_js(id),
                "position": position,
            }),
            RemoveOutcome::Vetoed => serde_json::json!({ "outcome": "vetoed" }),
            RemoveOutcome::NoRow => serde_json::json!({ "outcome": "noRow" }),
        };
        to_js(&payload)
    }

    /// Swap a row with the one above it. Returns whether a move happened.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an explicit position with no live row.
    #[wasm_bindgen(js_name = moveUpRow)]
    pub fn move_up_row(
        &self,
        position: Option<usize>,
        identity: Option<f64>,
    ) -> Result<bool, JsValue> {
        let identity = identity.and_then(row_id_from_js);
        Ok(self.lock()?.move_up_row(position, identity)?.is_some())
    }

    /// Swap a row with the one below it. Returns whether a move happened.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an explicit position with no live row.
    #[wasm_bindgen(js_name = moveDownRow)]
    pub fn move_down_row(
        &self,
        position: Option<usize>,
        identity: Option<f64>,
    ) -> Result<bool, JsValue> {
        let identity = identity.and_then(row_id_from_js);
        Ok(self.lock()?.move_down_row(position, identity)?.is_some())
    }

    /// Read one row as a flat `{column: value}` record; `suffix` appends
    /// `_suffix` to every key.
    ///
    /// # Errors
    ///
    /// Returns `MissingAccessor` if a `custom` column lacks a getter.
    #[wasm_bindgen(js_name = getRowValue)]
    pub fn get_row_value(&self, identity: f64, suffix: Option<String>) -> Result<JsValue, JsValue> {
        let id = row_id_from_js(identity)
            .ok_or_else(|| JsValue::from_str("invalid identity"))?;
        let record = self.lock()?.get_row_value(id, suffix.as_deref())?;
        to_js(&Value::Object(record))
    }

    /// Read one cell value.
    ///
    /// # Errors
    ///
    /// Returns `MissingAccessor` for a getter-less `custom` column and
    /// `InvalidInput` for an unknown column.
    #[wasm_bindgen(js_name = cellValue)]
    pub fn cell_value(&self, column: &str, identity: f64) -> Result<JsValue, JsValue> {
        let id = row_id_from_js(identity)
            .ok_or_else(|| JsValue::from_str("invalid identity"))?;
        let value = self.lock()?.cell_value(column, id)?;
        to_js(&value)
    }

    /// Write one cell value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown column.
    #[wasm_bindgen(js_name = setCellValue)]
    pub fn set_cell_value(
        &self,
        column: &str,
        identity: f64,
        value: JsValue,
    ) -> Result<(), JsValue> {
        let id = row_id_from_js(identity)
            .ok_or_else(|| JsValue::from_str("invalid identity"))?;
        let value: Value = serde_wasm_bindgen::from_value(value).unwrap_or(Value::Null);
        self.lock()?.set_cell_value(column, id, &value)?;
        Ok(())
    }

    /// Number of live rows.
    #[wasm_bindgen(js_name = rowCount)]
    pub fn row_count(&self) -> usize {
        self.inner.borrow().row_count()
    }

    /// Live identities in display order.
    #[wasm_bindgen(js_name = rowIds)]
    pub fn row_ids(&self) -> Vec<f64> {
        self.inner
            .borrow()
            .row_ids()
            .iter()
            .map(|&id| row_id_to_js(id))
            .collect()
    }
}

impl RowGrid {
    fn lock(&self) -> Result<RefMut<'_, GridCore<DomBridge>>, JsValue> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("reentrant grid operation"))
    }

    fn add_footer_button(
        &mut self,
        document: &Document,
        container: &Element,
        name: &str,
        run: impl Fn(&mut GridCore<DomBridge>) + 'static,
    ) -> Result<(), JsValue> {
        let button = document.create_element("button")?;
        let prefix = self.inner.borrow().config().id_prefix.clone();
        button.set_id(&format!("{prefix}_{name}"));
        button.set_attribute("type", "button")?;
        button.set_text_content(Some(name));

        let weak = Rc::downgrade(&self.inner);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            if let Some(core) = weak.upgrade() {
                if let Ok(mut core) = core.try_borrow_mut() {
                    run(&mut core);
                }
            }
        });
        button
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        self.footer_closures.push(closure);
        container.append_child(&button)?;
        Ok(())
    }
}

fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    // Records must reach JS as plain objects, not `Map`s.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    serde::Serialize::serialize(value, &serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn insert_result_to_js(result: &InsertResult) -> Result<JsValue, JsValue> {
    let payload = serde_json::json!({
        "addedRows": result.added_rows,
        "addedIds": result
            .added_ids
            .iter()
            .map(|&id| row_id_to_js(id))
            .collect::<Vec<_>>(),
        "parentPosition": result.parent_position,
        "insertPosition": result.insert_position,
    });
    to_js(&payload)
}
