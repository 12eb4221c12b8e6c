//! Browser smoke tests for the DOM attachment layer.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

use rowgrid::RowGrid;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn attach_table() -> web_sys::HtmlTableElement {
    let document = document();
    let table: web_sys::HtmlTableElement = document
        .create_element("table")
        .unwrap()
        .dyn_into()
        .unwrap();
    document.body().unwrap().append_child(&table).unwrap();
    table
}

fn options(json: &str) -> wasm_bindgen::JsValue {
    js_sys::JSON::parse(json).unwrap()
}

#[wasm_bindgen_test]
fn builds_skeleton_and_initial_rows() {
    let table = attach_table();
    let grid = RowGrid::new(
        table,
        options(
            r#"{"idPrefix":"t1","initRows":2,
                "columns":[{"name":"qty","display":"Qty"},
                           {"name":"active","display":"Active","type":"checkbox"}]}"#,
        ),
    )
    .unwrap();

    assert_eq!(grid.row_count(), 2);
    let document = document();
    assert!(document.get_element_by_id("t1_Row_1").is_some());
    assert!(document.get_element_by_id("t1_qty_1").is_some());
    assert!(document.get_element_by_id("t1_active_2").is_some());
    assert_eq!(
        document
            .get_element_by_id("t1_RowNum_2")
            .unwrap()
            .text_content()
            .as_deref(),
        Some("2")
    );
}

#[wasm_bindgen_test]
fn move_down_swaps_visuals_and_labels() {
    let table = attach_table();
    let grid = RowGrid::new(
        table,
        options(
            r#"{"idPrefix":"t2","initRows":2,
                "columns":[{"name":"qty","display":"Qty"}]}"#,
        ),
    )
    .unwrap();

    assert!(grid.move_down_row(None, Some(1.0)).unwrap());
    let document = document();
    assert_eq!(
        document
            .get_element_by_id("t2_RowNum_1")
            .unwrap()
            .text_content()
            .as_deref(),
        Some("2")
    );
    assert_eq!(grid.row_ids(), vec![2.0, 1.0]);
}

#[wasm_bindgen_test]
fn load_data_round_trips_values() {
    let table = attach_table();
    let grid = RowGrid::new(
        table,
        options(
            r#"{"idPrefix":"t3","initRows":0,
                "columns":[{"name":"qty","display":"Qty"},
                           {"name":"active","display":"Active","type":"checkbox"}]}"#,
        ),
    )
    .unwrap();

    grid.load_data(options(r#"[{"qty":"5","active":1},{"qty":"7","active":0}]"#))
        .unwrap();
    assert_eq!(grid.row_count(), 2);

    let ids = grid.row_ids();
    let first = grid.get_row_value(ids[0], None).unwrap();
    let qty = js_sys::Reflect::get(&first, &"qty".into()).unwrap();
    assert_eq!(qty.as_string().as_deref(), Some("5"));
}
