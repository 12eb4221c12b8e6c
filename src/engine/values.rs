//! Cell value adapter.
//!
//! Translates between a logical `(column, identity)` pair and the value
//! held by the concrete control (or custom accessor) behind it. Reads of
//! `custom` columns are strict (`MissingAccessor` without a getter);
//! writes are lenient (silently skipped without a setter), an asymmetry
//! preserved from the contract this grid implements.

use serde_json::Value;

use crate::bridge::RenderBridge;
use crate::error::{GridError, Result};
use crate::types::{ColumnKind, ColumnSpec, Record, RowId};

use super::GridCore;

impl<B: RenderBridge> GridCore<B> {
    /// Read the value of cell `(column, id)`.
    ///
    /// Boolean columns yield `1`/`0` (not `true`/`false`) for record
    /// compatibility; text-like columns yield the control's textual
    /// value, or `Null` when the control cannot be located.
    ///
    /// # Errors
    ///
    /// Returns `MissingAccessor` for a `custom` column with no getter, or
    /// `InvalidInput` for an unknown column name.
    pub fn cell_value(&self, column: &str, id: RowId) -> Result<Value> {
        let spec = self.column_spec(column)?;
        self.read_value(spec, id)
    }

    /// Write the value of cell `(column, id)`.
    ///
    /// Boolean columns treat `Null` and `0` as unchecked and anything
    /// else as checked; text-like columns coerce `Null` to the empty
    /// string. Writing a `custom` column with no setter is a no-op, as is
    /// writing to a control that no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown column name.
    pub fn set_cell_value(&self, column: &str, id: RowId, value: &Value) -> Result<()> {
        let spec = self.column_spec(column)?;
        self.write_value(spec, id, value);
        Ok(())
    }

    /// Read one whole row as a flat record, columns in schema order.
    ///
    /// With a `suffix`, keys become `name_suffix` so the record can be
    /// merged into a larger composite without collisions (grid embedded
    /// in a repeating outer structure).
    ///
    /// # Errors
    ///
    /// Returns `MissingAccessor` if any `custom` column lacks a getter.
    pub fn get_row_value(&self, id: RowId, suffix: Option<&str>) -> Result<Record> {
        let mut result = Record::new();
        for spec in &self.config.columns {
            let key = match suffix {
                Some(s) => format!("{}_{}", spec.name, s),
                None => spec.name.clone(),
            };
            result.insert(key, self.read_value(spec, id)?);
        }
        Ok(result)
    }

    /// Form name of the control for cell `(column, id)`: the configured
    /// formatter, or the default `{prefix}_{column}_{identity}` binding
    /// key.
    #[must_use]
    pub fn control_name(&self, column: &str, id: RowId) -> String {
        match &self.config.name_formatter {
            Some(formatter) => formatter(&self.config.id_prefix, column, id),
            None => format!("{}_{}_{}", self.config.id_prefix, column, id),
        }
    }

    fn column_spec(&self, name: &str) -> Result<&ColumnSpec> {
        self.config
            .columns
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| GridError::InvalidInput(format!("unknown column `{name}`")))
    }

    pub(super) fn read_value(&self, spec: &ColumnSpec, id: RowId) -> Result<Value> {
        match spec.kind {
            ColumnKind::Custom => match &spec.custom_getter {
                Some(getter) => Ok(getter(&self.config.id_prefix, &spec.name, id)),
                None => Err(GridError::MissingAccessor(spec.name.clone())),
            },
            _ => {
                let Some(control) = self.bridge.locate_control(&spec.name, id) else {
                    return Ok(Value::Null);
                };
                if spec.kind == ColumnKind::Checkbox {
                    Ok(Value::from(u8::from(control.is_checked())))
                } else {
                    Ok(Value::String(control.value()))
                }
            }
        }
    }

    pub(super) fn write_value(&self, spec: &ColumnSpec, id: RowId, value: &Value) {
        match spec.kind {
            ColumnKind::Custom => {
                if let Some(setter) = &spec.custom_setter {
                    setter(&self.config.id_prefix, &spec.name, id, value);
                }
                // No setter configured: skip the write.
            }
            ColumnKind::Checkbox => {
                if let Some(control) = self.bridge.locate_control(&spec.name, id) {
                    control.set_checked(checkbox_state(value));
                }
            }
            _ => {
                if let Some(control) = self.bridge.locate_control(&spec.name, id) {
                    control.set_value(&text_form(value));
                }
            }
        }
    }
}

/// Checked state for a written value: `Null` and `0` uncheck, anything
/// else checks, including `false`, matching the strict comparison the
/// record format has always used.
#[allow(clippy::float_cmp)]
fn checkbox_state(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

/// Textual form for a written value: only `Null` collapses to the empty
/// string; numbers and booleans keep their display form.
fn text_form(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkbox_state_null_and_zero_uncheck() {
        assert!(!checkbox_state(&Value::Null));
        assert!(!checkbox_state(&Value::from(0)));
        assert!(!checkbox_state(&Value::from(0.0)));
    }

    #[test]
    fn test_checkbox_state_everything_else_checks() {
        assert!(checkbox_state(&Value::from(1)));
        assert!(checkbox_state(&Value::from("0")));
        assert!(checkbox_state(&Value::Bool(false)));
        assert!(checkbox_state(&Value::Bool(true)));
    }

    #[test]
    fn test_text_form_null_is_empty() {
        assert_eq!(text_form(&Value::Null), "");
        assert_eq!(text_form(&Value::from(0)), "0");
        assert_eq!(text_form(&Value::Bool(false)), "false");
        assert_eq!(text_form(&Value::from("x")), "x");
    }
}
