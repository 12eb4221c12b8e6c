//! Grid configuration surface.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{ColumnSpec, Record, RowId};
use crate::error::{GridError, Result};

/// Formats the form name of a generated control:
/// `(id_prefix, column_name, identity) -> name`.
pub type NameFormatter = Rc<dyn Fn(&str, &str, RowId) -> String>;

/// Veto hook consulted before a row is removed. Returning `false` aborts
/// the removal unless the caller forces it.
pub type BeforeRowRemove = Rc<dyn Fn(RowId, usize) -> bool>;

/// One of the four per-row actions a grid exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    Insert,
    Remove,
    MoveUp,
    MoveDown,
}

impl RowAction {
    /// The action's wire name, as used in element ids and JS dispatch.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RowAction::Insert => "insert",
            RowAction::Remove => "remove",
            RowAction::MoveUp => "moveUp",
            RowAction::MoveDown => "moveDown",
        }
    }

    /// Parse a wire name back into an action.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "insert" => Some(RowAction::Insert),
            "remove" => Some(RowAction::Remove),
            "moveUp" => Some(RowAction::MoveUp),
            "moveDown" => Some(RowAction::MoveDown),
            _ => None,
        }
    }

    /// All actions in row-button display order.
    #[must_use]
    pub fn all() -> [RowAction; 4] {
        [
            RowAction::Insert,
            RowAction::Remove,
            RowAction::MoveUp,
            RowAction::MoveDown,
        ]
    }
}

/// Which per-row action buttons to suppress.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HideButtons {
    pub insert: bool,
    pub remove: bool,
    #[serde(rename = "moveUp")]
    pub move_up: bool,
    #[serde(rename = "moveDown")]
    pub move_down: bool,
}

impl HideButtons {
    /// Whether the button for `action` is hidden.
    #[must_use]
    pub fn hides(&self, action: RowAction) -> bool {
        match action {
            RowAction::Insert => self.insert,
            RowAction::Remove => self.remove,
            RowAction::MoveUp => self.move_up,
            RowAction::MoveDown => self.move_down,
        }
    }

    /// Whether every action button is hidden.
    #[must_use]
    pub fn all_hidden(&self) -> bool {
        self.insert && self.remove && self.move_up && self.move_down
    }
}

/// Configuration for one grid instance.
///
/// Built by the embedding application (or the DOM bootstrap on wasm32) and
/// consumed at construction; the column schema is fixed afterwards.
#[derive(Clone, Default)]
pub struct GridConfig {
    /// Ordered column schema; order is display order.
    pub columns: Vec<ColumnSpec>,
    /// Prefix for cell-binding keys and generated element ids.
    pub id_prefix: String,
    /// Number of blank rows created at construction when no `init_data`
    /// is supplied.
    pub init_rows: usize,
    /// Records loaded at construction instead of blank rows.
    pub init_data: Option<Vec<Record>>,
    /// Suppress the row-number column; sequence sync becomes a no-op.
    pub hide_row_num_column: bool,
    /// Place the row action buttons before the data cells.
    pub row_buttons_in_front: bool,
    /// Per-action button suppression.
    pub hide_buttons: HideButtons,
    /// Override for generated control form names.
    pub name_formatter: Option<NameFormatter>,
    /// Veto hook consulted before removals.
    pub before_row_remove: Option<BeforeRowRemove>,
}

impl GridConfig {
    /// Configuration with the given columns and the stock defaults.
    #[must_use]
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        GridConfig {
            columns,
            id_prefix: "rg".to_string(),
            init_rows: 3,
            ..Self::default()
        }
    }

    /// Check the column schema.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when the schema is empty, a column
    /// name is empty, or two columns share a name.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(GridError::InvalidConfiguration(
                "column schema is empty".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for column in &self.columns {
            if column.name.is_empty() {
                return Err(GridError::InvalidConfiguration(
                    "column with empty name".to_string(),
                ));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(GridError::InvalidConfiguration(format!(
                    "duplicate column name `{}`",
                    column.name
                )));
            }
        }
        Ok(())
    }
}
