//! Rendering bridge contract.
//!
//! The grid core never touches a rendering technology directly. Everything
//! visual goes through [`RenderBridge`]: creating/destroying/reordering row
//! visuals, refreshing rank labels, and locating the concrete control that
//! holds a cell's value. The DOM implementation lives in `crate::dom`
//! (wasm32); [`MemoryBridge`] is the headless implementation used by tests
//! and the CLI.

mod memory;

pub use memory::{MemoryBridge, MemoryControl};

use std::rc::Rc;

use crate::types::{RowAction, RowId};

/// A concrete value holder for one cell, as located by the bridge.
///
/// Textual and checked state coexist so one trait covers text-like and
/// boolean controls; implementations back whichever side applies.
pub trait CellControl {
    /// Current textual value.
    fn value(&self) -> String;

    /// Replace the textual value.
    fn set_value(&self, value: &str);

    /// Checked state of a boolean control.
    fn is_checked(&self) -> bool;

    /// Set the checked state of a boolean control.
    fn set_checked(&self, checked: bool);

    /// Give the control input focus.
    fn focus(&self) {}

    /// Drop input focus.
    fn blur(&self) {}
}

/// Capability contract toward the excluded visual collaborator.
///
/// The core calls these; it never inspects visual internals beyond the
/// returned handle or control reference. Implementations must not mutate
/// row order themselves; all mutation funnels through the operations
/// engine.
pub trait RenderBridge {
    /// Opaque reference to one row's visual representation.
    type Handle: Clone;

    /// Materialize a row visual for `id`. `position` is the display
    /// position to splice it in at; `None` appends.
    fn create_row_visual(&mut self, id: RowId, position: Option<usize>) -> Self::Handle;

    /// Destroy a row visual.
    fn remove_row_visual(&mut self, handle: &Self::Handle);

    /// Reorder a row visual: place it immediately before `before`, or at
    /// the end when `None`.
    fn move_row_visual(&mut self, handle: &Self::Handle, before: Option<&Self::Handle>);

    /// Write the 1-based rank label of the row named by `id`.
    fn set_rank_label(&mut self, id: RowId, rank: usize);

    /// Locate the control holding the cell `(column, id)`, or `None` if it
    /// cannot be found (row already gone).
    fn locate_control(&self, column: &str, id: RowId) -> Option<Rc<dyn CellControl>>;

    /// Shift input focus from `from`'s move control to `to`'s equivalent,
    /// if such controls exist, so repeated keyboard-driven moves follow
    /// the moving row. Default: no such controls.
    fn shift_move_focus(&mut self, action: RowAction, from: RowId, to: RowId) {
        let _ = (action, from, to);
    }
}
