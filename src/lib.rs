//! rowgrid - editable row grid for the web
//!
//! Renders an editable, spreadsheet-like grid inside a `<table>` and lets
//! the embedding application add, remove, and reorder rows while reading
//! and writing per-cell values through pluggable control types:
//! - Stable row identities, never reused for the grid's lifetime
//! - Display order kept independent of storage order across all operations
//! - Text, checkbox, hidden, and custom accessor-backed columns
//! - Headless bridge for server-side/native use and testing
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { RowGrid } from 'rowgrid';
//! await init();
//! const grid = new RowGrid(table, { columns: [{ name: 'qty', display: 'Qty' }] });
//! grid.insertRows(2);
//! grid.loadData([{ qty: '5' }]);
//! ```

// Core modules
pub mod bridge;
pub mod engine;
pub mod error;
pub mod store;
pub mod types;

// DOM attachment (browser only)
#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use bridge::{CellControl, MemoryBridge, MemoryControl, RenderBridge};
pub use engine::{GridCore, InsertResult, InsertSpec, MoveResult, RemoveOutcome};
pub use error::{GridError, Result};
pub use store::RowStore;
pub use types::{
    BeforeRowRemove, ColumnKind, ColumnSpec, CustomGetter, CustomSetter, GridConfig, HideButtons,
    NameFormatter, Record, RowAction, RowId,
};

#[cfg(target_arch = "wasm32")]
pub use dom::RowGrid;

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
