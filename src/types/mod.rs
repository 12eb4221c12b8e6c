//! Core data types: row identities, column schema, configuration.

mod column;
mod config;
mod row;

pub use column::{ColumnKind, ColumnSpec, CustomGetter, CustomSetter};
pub use config::{BeforeRowRemove, GridConfig, HideButtons, NameFormatter, RowAction};
pub use row::RowId;

/// One loaded or read-back row: a flat mapping of column name to value.
pub type Record = serde_json::Map<String, serde_json::Value>;
