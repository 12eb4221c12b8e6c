//! Common test utilities and grid builders.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use rowgrid::{ColumnSpec, GridConfig, GridCore, MemoryBridge, Record, RowId};

// ============================================================================
// Grid builders
// ============================================================================

/// Columns used by most tests: a text column and a checkbox column.
pub fn qty_active_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("qty", "Qty"),
        ColumnSpec::checkbox("active", "Active"),
    ]
}

/// Grid over `columns` with no initial rows.
pub fn empty_grid(columns: Vec<ColumnSpec>) -> GridCore<MemoryBridge> {
    let bridge = MemoryBridge::new(&columns);
    let mut config = GridConfig::new(columns);
    config.init_rows = 0;
    GridCore::new(config, bridge).expect("grid should build")
}

/// Grid built from a prepared config.
pub fn grid_with_config(config: GridConfig) -> GridCore<MemoryBridge> {
    let bridge = MemoryBridge::new(&config.columns);
    GridCore::new(config, bridge).expect("grid should build")
}

// ============================================================================
// Record helpers
// ============================================================================

/// Build a record from `(key, value)` pairs.
pub fn record(fields: &[(&str, serde_json::Value)]) -> Record {
    fields
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

/// Raw identity values of a grid's rows, in display order.
pub fn raw_ids(grid: &GridCore<MemoryBridge>) -> Vec<u64> {
    grid.row_ids().iter().map(|id| id.as_u64()).collect()
}

/// Identity of the row at `position`, panicking when absent.
pub fn id_at(grid: &GridCore<MemoryBridge>, position: usize) -> RowId {
    grid.id_at(position).expect("row should exist")
}
