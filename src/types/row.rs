//! Row identity.

use std::fmt;

/// Stable identity naming one row for the lifetime of a grid instance.
///
/// Identities are allocated by the row store's monotonic counter and are
/// never reused, even after the row they name is removed. They are opaque:
/// nothing about an identity encodes display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    /// Wrap a raw identity value (e.g. one received back from JavaScript).
    #[must_use]
    pub fn new(raw: u64) -> Self {
        RowId(raw)
    }

    /// The raw identity value.
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
