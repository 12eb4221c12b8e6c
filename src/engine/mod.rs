//! Row operations engine.
//!
//! `GridCore` owns the row store, the column schema, and a rendering
//! bridge, and turns caller operations (insert, remove, move, bulk-load)
//! into store mutations plus bridge calls. Every operation runs to
//! completion synchronously; the store is never left partially mutated.

mod values;

use std::collections::HashMap;

use serde_json::Value;

use crate::bridge::RenderBridge;
use crate::error::{GridError, Result};
use crate::store::RowStore;
use crate::types::{GridConfig, Record, RowAction, RowId};

/// What to insert: N blank rows, or an ordered batch of records.
#[derive(Debug, Clone)]
pub enum InsertSpec {
    /// Append/insert this many blank rows (defaults applied per column).
    Blank(usize),
    /// Load these records, one row per record, preserving order.
    Records(Vec<Record>),
}

/// Structured result of an insert, for the rendering side to mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertResult {
    /// Display positions of the new rows, as they were at insertion time.
    pub added_rows: Vec<usize>,
    /// Identities of the new rows, in the same order.
    pub added_ids: Vec<RowId>,
    /// Position of the row the batch landed after, if any.
    pub parent_position: Option<usize>,
    /// Resolved insert position; `None` means the batch was appended.
    pub insert_position: Option<usize>,
}

/// Outcome of a remove operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The row was removed.
    Removed { id: RowId, position: usize },
    /// The veto hook declined and `force` was not set; nothing changed.
    Vetoed,
    /// Nothing to remove: empty grid, or the identity is no longer live.
    NoRow,
}

/// Successful move: the row's identity and its old/new positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub id: RowId,
    pub from: usize,
    pub to: usize,
}

/// One grid instance: row store, schema, and rendering bridge.
pub struct GridCore<B: RenderBridge> {
    config: GridConfig,
    store: RowStore,
    bridge: B,
    handles: HashMap<RowId, B::Handle>,
}

impl<B: RenderBridge> GridCore<B> {
    /// Build a grid and create its initial rows: `init_data` records when
    /// configured, otherwise `init_rows` blank rows.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a malformed schema, or
    /// `InvalidInput` when `init_data` is present but empty.
    pub fn new(mut config: GridConfig, bridge: B) -> Result<Self> {
        config.validate()?;
        let init_data = config.init_data.take();
        let init_rows = config.init_rows;
        let mut grid = GridCore {
            config,
            store: RowStore::new(),
            bridge,
            handles: HashMap::new(),
        };
        if let Some(records) = init_data {
            grid.load_data(records)?;
        } else if init_rows > 0 {
            grid.insert_rows(InsertSpec::Blank(init_rows), None, None)?;
        }
        Ok(grid)
    }

    /// Number of live rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.store.len()
    }

    /// Live identities in display order.
    #[must_use]
    pub fn row_ids(&self) -> &[RowId] {
        self.store.ids()
    }

    /// Display position of `id`, or `None` when the identity is dead.
    #[must_use]
    pub fn position_of(&self, id: RowId) -> Option<usize> {
        self.store.position_of(id)
    }

    /// Identity at display position.
    #[must_use]
    pub fn id_at(&self, position: usize) -> Option<RowId> {
        self.store.id_at(position)
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[must_use]
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Insert rows relative to an anchor.
    ///
    /// Target resolution: `anchor` identity takes priority over
    /// `position`; an unknown anchor or a position at/beyond the end
    /// normalizes to an append; with neither given the batch is appended
    /// after the current last row. Positional batches land in source
    /// order, each row after the previous one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `spec` is an empty record batch.
    /// Inserting zero blank rows is a no-op returning an empty result.
    pub fn insert_rows(
        &mut self,
        spec: InsertSpec,
        position: Option<usize>,
        anchor: Option<RowId>,
    ) -> Result<InsertResult> {
        let (count, records) = match spec {
            InsertSpec::Blank(n) => (n, None),
            InsertSpec::Records(batch) => {
                if batch.is_empty() {
                    return Err(GridError::InvalidInput(
                        "records should be a non-empty sequence".to_string(),
                    ));
                }
                (batch.len(), Some(batch))
            }
        };
        if count == 0 {
            return Ok(InsertResult::default());
        }

        // Resolve the target anchor.
        let mut resolved: Option<usize> = None;
        let mut parent_position: Option<usize> = None;
        if let Some(id) = anchor {
            if let Some(pos) = self.store.position_of(id) {
                resolved = Some(pos);
                parent_position = pos.checked_sub(1);
            }
            // Unknown anchor: proceed as an append.
        } else if let Some(pos) = position {
            if pos < self.store.len() {
                resolved = Some(pos);
                parent_position = pos.checked_sub(1);
            }
            // At/beyond the end: append.
        } else if !self.store.is_empty() {
            parent_position = Some(self.store.len() - 1);
        }
        let insert_position = resolved;

        let mut added_rows = Vec::with_capacity(count);
        let mut added_ids = Vec::with_capacity(count);
        for z in 0..count {
            let id = self.store.next_id();
            let at = match resolved.as_mut() {
                Some(next) => {
                    self.store.insert_at(*next, id)?;
                    let at = *next;
                    // Subsequent rows land after this one, preserving
                    // source order.
                    *next += 1;
                    at
                }
                None => {
                    self.store.push(id);
                    self.store.len() - 1
                }
            };
            let handle = self
                .bridge
                .create_row_visual(id, insert_position.map(|_| at));
            self.handles.insert(id, handle);
            added_rows.push(at);
            added_ids.push(id);

            self.populate_row(id, records.as_ref().and_then(|batch| batch.get(z)));
        }

        // Every row after a positional insertion point shifted rank.
        if let Some(start) = insert_position {
            self.sort_sequence(start);
        }

        Ok(InsertResult {
            added_rows,
            added_ids,
            parent_position,
            insert_position,
        })
    }

    /// Remove one row.
    ///
    /// Target resolution: `identity` takes priority over `position`; with
    /// neither given the last row is removed. A dead identity or an empty
    /// grid is a no-op. The configured veto hook is consulted unless
    /// `force` is set.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an explicit position with no live row.
    pub fn remove_row(
        &mut self,
        position: Option<usize>,
        identity: Option<RowId>,
        force: bool,
    ) -> Result<RemoveOutcome> {
        let len = self.store.len();
        let target = if let Some(id) = identity {
            match self.store.position_of(id) {
                Some(pos) => pos,
                None => return Ok(RemoveOutcome::NoRow),
            }
        } else if let Some(pos) = position {
            if len == 0 {
                return Ok(RemoveOutcome::NoRow);
            }
            if pos >= len {
                return Err(GridError::OutOfRange { position: pos, len });
            }
            pos
        } else {
            if len == 0 {
                return Ok(RemoveOutcome::NoRow);
            }
            len - 1
        };

        let Some(target_id) = self.store.id_at(target) else {
            return Ok(RemoveOutcome::NoRow);
        };

        if !force {
            if let Some(hook) = &self.config.before_row_remove {
                if !hook(target_id, target) {
                    return Ok(RemoveOutcome::Vetoed);
                }
            }
        }

        let is_tail = target + 1 == len;
        let id = self.store.remove_at(target)?;
        if let Some(handle) = self.handles.remove(&id) {
            self.bridge.remove_row_visual(&handle);
        }
        // Tail removal leaves every remaining rank untouched.
        if !is_tail {
            self.sort_sequence(target);
        }
        Ok(RemoveOutcome::Removed { id, position: target })
    }

    /// Swap a row with the one above it. No-op (`Ok(None)`) when the row
    /// is already first, the identity is dead, or no target was given.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an explicit position with no live row.
    pub fn move_up_row(
        &mut self,
        position: Option<usize>,
        identity: Option<RowId>,
    ) -> Result<Option<MoveResult>> {
        let Some(from) = self.resolve_move_target(position, identity)? else {
            return Ok(None);
        };
        if from == 0 {
            return Ok(None);
        }
        let to = from - 1;
        let (Some(moved), Some(neighbor)) = (self.store.id_at(from), self.store.id_at(to)) else {
            return Ok(None);
        };
        self.store.swap(to, from)?;

        // The moved row's visual goes immediately above its old neighbor.
        let handles = (
            self.handles.get(&moved).cloned(),
            self.handles.get(&neighbor).cloned(),
        );
        if let (Some(moved_handle), Some(neighbor_handle)) = handles {
            self.bridge
                .move_row_visual(&moved_handle, Some(&neighbor_handle));
        }
        self.exchange_rank_labels(moved, to, neighbor, from);
        self.bridge.shift_move_focus(RowAction::MoveUp, moved, neighbor);
        Ok(Some(MoveResult { id: moved, from, to }))
    }

    /// Swap a row with the one below it. No-op (`Ok(None)`) when the row
    /// is already last, the identity is dead, or no target was given.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an explicit position with no live row.
    pub fn move_down_row(
        &mut self,
        position: Option<usize>,
        identity: Option<RowId>,
    ) -> Result<Option<MoveResult>> {
        let Some(from) = self.resolve_move_target(position, identity)? else {
            return Ok(None);
        };
        if from + 1 >= self.store.len() {
            return Ok(None);
        }
        let to = from + 1;
        let (Some(moved), Some(neighbor)) = (self.store.id_at(from), self.store.id_at(to)) else {
            return Ok(None);
        };
        self.store.swap(from, to)?;

        // Moving down is lifting the neighbor above the moved row.
        let handles = (
            self.handles.get(&moved).cloned(),
            self.handles.get(&neighbor).cloned(),
        );
        if let (Some(moved_handle), Some(neighbor_handle)) = handles {
            self.bridge
                .move_row_visual(&neighbor_handle, Some(&moved_handle));
        }
        self.exchange_rank_labels(moved, to, neighbor, from);
        self.bridge
            .shift_move_focus(RowAction::MoveDown, moved, neighbor);
        Ok(Some(MoveResult { id: moved, from, to }))
    }

    /// Replace all rows with the given records.
    ///
    /// Existing rows are retired; the identity counter keeps climbing, so
    /// identities from before the load are never minted again.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `records` is empty; callers must not
    /// bulk-load nothing.
    pub fn load_data(&mut self, records: Vec<Record>) -> Result<InsertResult> {
        if records.is_empty() {
            return Err(GridError::InvalidInput(
                "records should be a non-empty sequence".to_string(),
            ));
        }
        for id in self.store.ids().to_vec() {
            if let Some(handle) = self.handles.remove(&id) {
                self.bridge.remove_row_visual(&handle);
            }
        }
        self.store.clear_rows();
        self.insert_rows(InsertSpec::Records(records), None, None)
    }

    /// Re-write rank labels for every position at or after
    /// `start_position`.
    ///
    /// Required after any operation that shifts the rank of more than two
    /// rows; skippable after a pure append or tail removal. Calling it
    /// unconditionally is safe, just wasteful.
    pub fn sort_sequence(&mut self, start_position: usize) {
        if self.config.hide_row_num_column {
            return;
        }
        for (position, &id) in self.store.ids().iter().enumerate().skip(start_position) {
            self.bridge.set_rank_label(id, position + 1);
        }
    }

    /// Single dispatcher for row-button events: an explicit
    /// `(action, identity)` payload instead of per-control closures.
    ///
    /// # Errors
    ///
    /// Propagates the underlying operation's error.
    pub fn dispatch(&mut self, action: RowAction, id: RowId) -> Result<()> {
        match action {
            RowAction::Insert => {
                self.insert_rows(InsertSpec::Blank(1), None, Some(id))?;
            }
            RowAction::Remove => {
                self.remove_row(None, Some(id), false)?;
            }
            RowAction::MoveUp => {
                self.move_up_row(None, Some(id))?;
            }
            RowAction::MoveDown => {
                self.move_down_row(None, Some(id))?;
            }
        }
        Ok(())
    }

    /// Unified target resolution for the move operations: identity takes
    /// priority, position is the fallback, absence is a no-op.
    fn resolve_move_target(
        &self,
        position: Option<usize>,
        identity: Option<RowId>,
    ) -> Result<Option<usize>> {
        if let Some(id) = identity {
            return Ok(self.store.position_of(id));
        }
        if let Some(pos) = position {
            let len = self.store.len();
            if pos >= len {
                return Err(GridError::OutOfRange { position: pos, len });
            }
            return Ok(Some(pos));
        }
        Ok(None)
    }

    /// Exchange exactly two rank labels after a swap; the rest of the
    /// tail is untouched.
    fn exchange_rank_labels(&mut self, moved: RowId, to: usize, neighbor: RowId, from: usize) {
        if self.config.hide_row_num_column {
            return;
        }
        self.bridge.set_rank_label(moved, to + 1);
        self.bridge.set_rank_label(neighbor, from + 1);
    }

    /// Populate one new row's cells in schema order: record value when
    /// loading, else the column default, else the control's native empty
    /// state.
    fn populate_row(&self, id: RowId, record: Option<&Record>) {
        for spec in &self.config.columns {
            if let Some(rec) = record {
                let value = rec.get(&spec.name).cloned().unwrap_or(Value::Null);
                self.write_value(spec, id, &value);
            } else if let Some(default) = &spec.default_value {
                self.write_value(spec, id, default);
            }
        }
    }
}
