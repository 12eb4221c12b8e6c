//! Headless rendering bridge.
//!
//! Holds row visuals and cell controls in memory instead of a document
//! tree. This is the native test/CLI path; behavior mirrors what the DOM
//! bridge does to real elements.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{CellControl, RenderBridge};
use crate::types::{ColumnKind, ColumnSpec, RowAction, RowId};

/// In-memory stand-in for one generated control.
#[derive(Debug, Default)]
pub struct MemoryControl {
    value: RefCell<String>,
    checked: Cell<bool>,
    focused: Cell<bool>,
}

impl MemoryControl {
    /// Whether the control currently holds focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }
}

impl CellControl for MemoryControl {
    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: &str) {
        *self.value.borrow_mut() = value.to_string();
    }

    fn is_checked(&self) -> bool {
        self.checked.get()
    }

    fn set_checked(&self, checked: bool) {
        self.checked.set(checked);
    }

    fn focus(&self) {
        self.focused.set(true);
    }

    fn blur(&self) {
        self.focused.set(false);
    }
}

/// Bridge implementation holding everything in memory.
#[derive(Default)]
pub struct MemoryBridge {
    columns: Vec<(String, ColumnKind)>,
    controls: HashMap<(RowId, String), Rc<MemoryControl>>,
    visual_order: Vec<RowId>,
    rank_labels: HashMap<RowId, usize>,
    focused_move: Option<(RowAction, RowId)>,
}

impl MemoryBridge {
    /// Bridge for the given schema. Controls are materialized per row for
    /// every non-custom column; custom columns are accessor-backed and own
    /// no control here.
    #[must_use]
    pub fn new(columns: &[ColumnSpec]) -> Self {
        MemoryBridge {
            columns: columns
                .iter()
                .map(|c| (c.name.clone(), c.kind))
                .collect(),
            ..Self::default()
        }
    }

    /// Visual display order, for assertions.
    #[must_use]
    pub fn visual_order(&self) -> &[RowId] {
        &self.visual_order
    }

    /// Last rank label written for `id`.
    #[must_use]
    pub fn rank_label(&self, id: RowId) -> Option<usize> {
        self.rank_labels.get(&id).copied()
    }

    /// The control backing `(column, id)`, if the row is live.
    #[must_use]
    pub fn control(&self, column: &str, id: RowId) -> Option<&Rc<MemoryControl>> {
        self.controls.get(&(id, column.to_string()))
    }

    /// Where move focus last landed: `(action, identity)`.
    #[must_use]
    pub fn focused_move(&self) -> Option<(RowAction, RowId)> {
        self.focused_move
    }
}

impl RenderBridge for MemoryBridge {
    type Handle = RowId;

    fn create_row_visual(&mut self, id: RowId, position: Option<usize>) -> Self::Handle {
        let at = position
            .filter(|&p| p <= self.visual_order.len())
            .unwrap_or(self.visual_order.len());
        self.visual_order.insert(at, id);
        self.rank_labels.insert(id, at + 1);
        for (name, kind) in &self.columns {
            if *kind == ColumnKind::Custom {
                continue;
            }
            self.controls
                .insert((id, name.clone()), Rc::new(MemoryControl::default()));
        }
        id
    }

    fn remove_row_visual(&mut self, handle: &Self::Handle) {
        self.visual_order.retain(|entry| entry != handle);
        self.rank_labels.remove(handle);
        self.controls.retain(|(id, _), _| id != handle);
    }

    fn move_row_visual(&mut self, handle: &Self::Handle, before: Option<&Self::Handle>) {
        self.visual_order.retain(|entry| entry != handle);
        let at = before
            .and_then(|b| self.visual_order.iter().position(|entry| entry == b))
            .unwrap_or(self.visual_order.len());
        self.visual_order.insert(at, *handle);
    }

    fn set_rank_label(&mut self, id: RowId, rank: usize) {
        self.rank_labels.insert(id, rank);
    }

    fn locate_control(&self, column: &str, id: RowId) -> Option<Rc<dyn CellControl>> {
        self.controls
            .get(&(id, column.to_string()))
            .map(|control| Rc::clone(control) as Rc<dyn CellControl>)
    }

    fn shift_move_focus(&mut self, action: RowAction, from: RowId, to: RowId) {
        let _ = from;
        self.focused_move = Some((action, to));
    }
}
