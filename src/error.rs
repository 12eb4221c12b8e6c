//! Structured error types for rowgrid.
//!
//! Dead row identities are deliberately not represented here: an operation
//! given an identity that no longer resolves returns a no-op outcome, since
//! the row may already have been removed earlier in the same turn.

/// All errors that can occur while configuring or operating a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Malformed column schema or grid configuration. Fatal at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Bulk-load called with nothing to load. Fatal to that call only.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Position outside the current row bounds, with no sane normalization.
    #[error("position {position} out of range for {len} row(s)")]
    OutOfRange { position: usize, len: usize },

    /// Reading a `custom` column that has no getter configured.
    ///
    /// The write side is intentionally asymmetric: setting a `custom` column
    /// with no setter is a silent no-op.
    #[error("custom getter of column `{0}` is not defined")]
    MissingAccessor(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
