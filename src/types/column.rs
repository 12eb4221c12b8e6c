//! Column schema: static description of each grid column.
//!
//! Produced once at configuration time; column order is display order and
//! is fixed after construction.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RowId;

/// Value kind of a column, deciding which control handles its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Text-like control; reads yield the control's textual value.
    #[default]
    Text,
    /// Boolean control; reads yield `1`/`0` for record compatibility.
    Checkbox,
    /// No visible cell; materialized as a hidden control, read like text.
    Hidden,
    /// Value access delegated to the column's custom accessor pair.
    Custom,
}

/// Custom read accessor: `(id_prefix, column_name, identity) -> value`.
pub type CustomGetter = Rc<dyn Fn(&str, &str, RowId) -> Value>;

/// Custom write accessor: `(id_prefix, column_name, identity, value)`.
pub type CustomSetter = Rc<dyn Fn(&str, &str, RowId, &Value)>;

/// Static description of one column.
#[derive(Clone)]
pub struct ColumnSpec {
    /// Field name, unique within the schema. Keys loaded records and the
    /// derived cell-binding key.
    pub name: String,
    /// Header label shown for the column.
    pub display: String,
    /// Value kind.
    pub kind: ColumnKind,
    /// Value applied to blank-inserted rows. `None` leaves the control in
    /// its native empty state.
    pub default_value: Option<Value>,
    /// Extra attributes applied to generated controls.
    pub ctrl_attrs: Vec<(String, String)>,
    /// Read accessor, required for reads of `Custom` columns.
    pub custom_getter: Option<CustomGetter>,
    /// Write accessor. Writing a `Custom` column without one is a silent
    /// no-op (the read side is strict, the write side lenient).
    pub custom_setter: Option<CustomSetter>,
}

impl ColumnSpec {
    /// A text column.
    #[must_use]
    pub fn new(name: &str, display: &str) -> Self {
        ColumnSpec {
            name: name.to_string(),
            display: display.to_string(),
            kind: ColumnKind::Text,
            default_value: None,
            ctrl_attrs: Vec::new(),
            custom_getter: None,
            custom_setter: None,
        }
    }

    /// A checkbox column.
    #[must_use]
    pub fn checkbox(name: &str, display: &str) -> Self {
        ColumnSpec {
            kind: ColumnKind::Checkbox,
            ..Self::new(name, display)
        }
    }

    /// A hidden column.
    #[must_use]
    pub fn hidden(name: &str) -> Self {
        ColumnSpec {
            kind: ColumnKind::Hidden,
            ..Self::new(name, "")
        }
    }

    /// A custom column; attach accessors with [`with_getter`](Self::with_getter)
    /// and [`with_setter`](Self::with_setter).
    #[must_use]
    pub fn custom(name: &str, display: &str) -> Self {
        ColumnSpec {
            kind: ColumnKind::Custom,
            ..Self::new(name, display)
        }
    }

    /// Set the default value for blank-inserted rows.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Add a control attribute.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.ctrl_attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Set the custom read accessor.
    #[must_use]
    pub fn with_getter(mut self, getter: CustomGetter) -> Self {
        self.custom_getter = Some(getter);
        self
    }

    /// Set the custom write accessor.
    #[must_use]
    pub fn with_setter(mut self, setter: CustomSetter) -> Self {
        self.custom_setter = Some(setter);
        self
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("name", &self.name)
            .field("display", &self.display)
            .field("kind", &self.kind)
            .field("default_value", &self.default_value)
            .field("ctrl_attrs", &self.ctrl_attrs)
            .field("custom_getter", &self.custom_getter.is_some())
            .field("custom_setter", &self.custom_setter.is_some())
            .finish()
    }
}
