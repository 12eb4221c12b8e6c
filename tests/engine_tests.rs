//! Tests for the row operations engine: insert, remove, move, bulk-load.

mod common;

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::common::*;
    use rowgrid::{
        ColumnSpec, GridConfig, GridError, InsertSpec, RemoveOutcome, RowAction, RowId,
    };

    // ================================================================
    // Construction
    // ================================================================

    #[test]
    fn test_init_rows_default() {
        let columns = qty_active_columns();
        let bridge = rowgrid::MemoryBridge::new(&columns);
        let grid = rowgrid::GridCore::new(GridConfig::new(columns), bridge).unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(raw_ids(&grid), vec![1, 2, 3]);
    }

    #[test]
    fn test_init_data_loads_records() {
        let mut config = GridConfig::new(qty_active_columns());
        config.init_data = Some(vec![
            record(&[("qty", "7".into())]),
            record(&[("qty", "8".into())]),
        ]);
        let grid = grid_with_config(config);
        assert_eq!(grid.row_count(), 2);
        let first = id_at(&grid, 0);
        assert_eq!(grid.cell_value("qty", first).unwrap(), "7");
    }

    #[test]
    fn test_empty_schema_rejected() {
        let config = GridConfig::new(Vec::new());
        let result = rowgrid::GridCore::new(config, rowgrid::MemoryBridge::new(&[]));
        assert!(matches!(
            result.map(|_| ()),
            Err(GridError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let columns = vec![ColumnSpec::new("a", "A"), ColumnSpec::new("a", "A again")];
        let bridge = rowgrid::MemoryBridge::new(&columns);
        let result = rowgrid::GridCore::new(GridConfig::new(columns), bridge);
        assert!(matches!(
            result.map(|_| ()),
            Err(GridError::InvalidConfiguration(_))
        ));
    }

    // ================================================================
    // Insert
    // ================================================================

    #[test]
    fn test_append_blank_rows() {
        let mut grid = empty_grid(qty_active_columns());
        let result = grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();

        assert_eq!(result.added_rows, vec![0, 1, 2]);
        assert_eq!(result.parent_position, None);
        assert_eq!(result.insert_position, None);
        assert_eq!(raw_ids(&grid), vec![1, 2, 3]);
    }

    #[test]
    fn test_append_after_existing_reports_parent() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();

        let result = grid.insert_rows(InsertSpec::Blank(1), None, None).unwrap();
        assert_eq!(result.parent_position, Some(1));
        assert_eq!(result.added_rows, vec![2]);
    }

    #[test]
    fn test_insert_zero_rows_is_noop() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();

        let result = grid.insert_rows(InsertSpec::Blank(0), None, None).unwrap();
        assert!(result.added_rows.is_empty());
        assert_eq!(grid.row_count(), 2);

        // The identity counter did not advance.
        let next = grid.insert_rows(InsertSpec::Blank(1), None, None).unwrap();
        assert_eq!(next.added_ids, vec![RowId::new(3)]);
    }

    #[test]
    fn test_positional_insert_preserves_source_order() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();

        let result = grid
            .insert_rows(InsertSpec::Blank(2), Some(0), None)
            .unwrap();
        assert_eq!(result.added_rows, vec![0, 1]);
        assert_eq!(result.insert_position, Some(0));
        assert_eq!(result.parent_position, None);
        assert_eq!(raw_ids(&grid), vec![4, 5, 1, 2, 3]);
    }

    #[test]
    fn test_positional_insert_resyncs_ranks() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();
        grid.insert_rows(InsertSpec::Blank(2), Some(1), None).unwrap();

        for (position, &id) in grid.row_ids().iter().enumerate() {
            assert_eq!(grid.bridge().rank_label(id), Some(position + 1));
        }
    }

    #[test]
    fn test_insert_beyond_end_appends() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();

        let result = grid
            .insert_rows(InsertSpec::Blank(1), Some(99), None)
            .unwrap();
        assert_eq!(result.insert_position, None);
        assert_eq!(raw_ids(&grid), vec![1, 2, 3]);
    }

    #[test]
    fn test_anchor_inserts_at_anchor_row() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();
        let middle = id_at(&grid, 1);

        let result = grid
            .insert_rows(InsertSpec::Blank(1), None, Some(middle))
            .unwrap();
        assert_eq!(result.insert_position, Some(1));
        assert_eq!(result.parent_position, Some(0));
        assert_eq!(raw_ids(&grid), vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_anchor_takes_priority_over_position() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();
        let first = id_at(&grid, 0);

        let result = grid
            .insert_rows(InsertSpec::Blank(1), Some(2), Some(first))
            .unwrap();
        assert_eq!(result.insert_position, Some(0));
    }

    #[test]
    fn test_unknown_anchor_appends() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();

        let result = grid
            .insert_rows(InsertSpec::Blank(1), None, Some(RowId::new(999)))
            .unwrap();
        assert_eq!(result.insert_position, None);
        assert_eq!(raw_ids(&grid), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_record_batch_is_invalid_input() {
        let mut grid = empty_grid(qty_active_columns());
        let result = grid.insert_rows(InsertSpec::Records(Vec::new()), None, None);
        assert!(matches!(result, Err(GridError::InvalidInput(_))));
        assert_eq!(grid.row_count(), 0);
    }

    // ================================================================
    // Identity invariants
    // ================================================================

    #[test]
    fn test_identities_unique_and_strictly_increasing() {
        let mut grid = empty_grid(qty_active_columns());
        let mut minted = Vec::new();

        for round in 0..5 {
            let result = grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();
            minted.extend(result.added_ids.iter().map(|id| id.as_u64()));
            if round % 2 == 0 {
                grid.remove_row(Some(0), None, true).unwrap();
            }
        }

        let mut sorted = minted.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), minted.len(), "no identity is ever reused");
        assert!(minted.windows(2).all(|w| w[0] < w[1]));
        // 10 successful inserts, 3 removals.
        assert_eq!(grid.row_count(), 7);
    }

    #[test]
    fn test_load_data_does_not_reset_counter() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();

        let result = grid
            .load_data(vec![
                record(&[("qty", "a".into())]),
                record(&[("qty", "b".into())]),
            ])
            .unwrap();
        assert_eq!(result.added_ids, vec![RowId::new(3), RowId::new(4)]);
        assert_eq!(raw_ids(&grid), vec![3, 4]);
        // Retired identities stay dead.
        assert_eq!(grid.position_of(RowId::new(1)), None);
    }

    // ================================================================
    // Remove
    // ================================================================

    #[test]
    fn test_remove_without_target_removes_last() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();

        let outcome = grid.remove_row(None, None, false).unwrap();
        assert_eq!(
            outcome,
            RemoveOutcome::Removed {
                id: RowId::new(3),
                position: 2
            }
        );
        assert_eq!(raw_ids(&grid), vec![1, 2]);
    }

    #[test]
    fn test_remove_on_empty_grid_is_noop() {
        let mut grid = empty_grid(qty_active_columns());
        assert_eq!(grid.remove_row(None, None, false).unwrap(), RemoveOutcome::NoRow);

        // The identity counter did not advance.
        let result = grid.insert_rows(InsertSpec::Blank(1), None, None).unwrap();
        assert_eq!(result.added_ids, vec![RowId::new(1)]);
    }

    #[test]
    fn test_remove_middle_row_resyncs_ranks() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();

        grid.remove_row(Some(0), None, true).unwrap();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.bridge().rank_label(id_at(&grid, 0)), Some(1));
        assert_eq!(grid.bridge().rank_label(id_at(&grid, 1)), Some(2));
    }

    #[test]
    fn test_remove_by_dead_identity_is_noop() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();
        let first = id_at(&grid, 0);
        grid.remove_row(None, Some(first), true).unwrap();

        let outcome = grid.remove_row(None, Some(first), true).unwrap();
        assert_eq!(outcome, RemoveOutcome::NoRow);
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn test_remove_identity_takes_priority_over_position() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();
        let last = id_at(&grid, 2);

        grid.remove_row(Some(0), Some(last), true).unwrap();
        assert_eq!(raw_ids(&grid), vec![1, 2]);
    }

    #[test]
    fn test_remove_out_of_range_position_errors() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();

        let result = grid.remove_row(Some(5), None, true);
        assert!(matches!(
            result,
            Err(GridError::OutOfRange { position: 5, len: 2 })
        ));
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn test_remove_veto_aborts_unless_forced() {
        let calls = Rc::new(Cell::new(0));
        let seen_position = Rc::new(Cell::new(usize::MAX));
        let mut config = GridConfig::new(qty_active_columns());
        config.init_rows = 2;
        config.before_row_remove = Some(Rc::new({
            let calls = Rc::clone(&calls);
            let seen_position = Rc::clone(&seen_position);
            move |_, position| {
                calls.set(calls.get() + 1);
                seen_position.set(position);
                false
            }
        }));
        let mut grid = grid_with_config(config);

        let outcome = grid.remove_row(None, None, false).unwrap();
        assert_eq!(outcome, RemoveOutcome::Vetoed);
        assert_eq!(calls.get(), 1);
        assert_eq!(seen_position.get(), 1);
        assert_eq!(grid.row_count(), 2);

        // Force bypasses the hook entirely.
        let outcome = grid.remove_row(None, None, true).unwrap();
        assert!(matches!(outcome, RemoveOutcome::Removed { .. }));
        assert_eq!(calls.get(), 1);
        assert_eq!(grid.row_count(), 1);
    }

    // ================================================================
    // Move
    // ================================================================

    #[test]
    fn test_move_up_first_row_is_noop() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();
        let first = id_at(&grid, 0);

        assert_eq!(grid.move_up_row(None, Some(first)).unwrap(), None);
        assert_eq!(raw_ids(&grid), vec![1, 2]);
    }

    #[test]
    fn test_move_down_last_row_is_noop() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();
        let last = id_at(&grid, 1);

        assert_eq!(grid.move_down_row(None, Some(last)).unwrap(), None);
        assert_eq!(raw_ids(&grid), vec![1, 2]);
    }

    #[test]
    fn test_move_without_target_is_noop() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();
        assert_eq!(grid.move_up_row(None, None).unwrap(), None);
        assert_eq!(grid.move_down_row(None, None).unwrap(), None);
    }

    #[test]
    fn test_move_out_of_range_position_errors() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();
        assert!(matches!(
            grid.move_up_row(Some(9), None),
            Err(GridError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_move_down_swaps_order_labels_and_values() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();
        let (id1, id2) = (id_at(&grid, 0), id_at(&grid, 1));
        grid.set_cell_value("qty", id1, &"5".into()).unwrap();

        let moved = grid.move_down_row(None, Some(id1)).unwrap().unwrap();
        assert_eq!(moved.from, 0);
        assert_eq!(moved.to, 1);
        assert_eq!(grid.row_ids(), &[id2, id1]);
        assert_eq!(grid.bridge().visual_order(), &[id2, id1]);
        assert_eq!(grid.bridge().rank_label(id1), Some(2));
        assert_eq!(grid.bridge().rank_label(id2), Some(1));
        assert_eq!(grid.get_row_value(id1, None).unwrap()["qty"], "5");
    }

    #[test]
    fn test_move_up_swaps_and_shifts_focus_to_neighbor() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();
        let moved = id_at(&grid, 2);
        let neighbor = id_at(&grid, 1);

        grid.move_up_row(None, Some(moved)).unwrap().unwrap();
        assert_eq!(raw_ids(&grid), vec![1, 3, 2]);
        assert_eq!(grid.bridge().visual_order(), grid.row_ids());
        assert_eq!(
            grid.bridge().focused_move(),
            Some((RowAction::MoveUp, neighbor))
        );
    }

    #[test]
    fn test_move_by_position_fallback() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();

        grid.move_down_row(Some(0), None).unwrap().unwrap();
        assert_eq!(raw_ids(&grid), vec![2, 1, 3]);
    }

    // ================================================================
    // Rank correctness
    // ================================================================

    #[test]
    fn test_ranks_after_append_then_front_insert() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();
        grid.insert_rows(InsertSpec::Blank(1), Some(0), None).unwrap();

        assert_eq!(grid.row_count(), 4);
        for (position, &id) in grid.row_ids().iter().enumerate() {
            assert_eq!(grid.bridge().rank_label(id), Some(position + 1));
        }
    }

    #[test]
    fn test_sort_sequence_is_always_safe() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(4), None, None).unwrap();
        grid.sort_sequence(0);
        for (position, &id) in grid.row_ids().iter().enumerate() {
            assert_eq!(grid.bridge().rank_label(id), Some(position + 1));
        }
    }

    #[test]
    fn test_hidden_row_num_column_skips_labels() {
        let mut config = GridConfig::new(qty_active_columns());
        config.init_rows = 0;
        config.hide_row_num_column = true;
        let mut grid = grid_with_config(config);
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();

        grid.sort_sequence(0);
        // Creation-time labels come from the bridge; the engine never
        // rewrites them while the column is hidden.
        grid.move_down_row(Some(0), None).unwrap().unwrap();
        let first = id_at(&grid, 0);
        assert_eq!(grid.bridge().rank_label(first), Some(2));
    }

    // ================================================================
    // Dispatch
    // ================================================================

    #[test]
    fn test_dispatch_insert_lands_at_caller_row() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(2), None, None).unwrap();
        let first = id_at(&grid, 0);

        grid.dispatch(RowAction::Insert, first).unwrap();
        assert_eq!(raw_ids(&grid), vec![3, 1, 2]);
    }

    #[test]
    fn test_dispatch_remove_and_moves() {
        let mut grid = empty_grid(qty_active_columns());
        grid.insert_rows(InsertSpec::Blank(3), None, None).unwrap();
        let (id1, id2) = (id_at(&grid, 0), id_at(&grid, 1));

        grid.dispatch(RowAction::MoveDown, id1).unwrap();
        assert_eq!(raw_ids(&grid), vec![2, 1, 3]);

        grid.dispatch(RowAction::MoveUp, id1).unwrap();
        assert_eq!(raw_ids(&grid), vec![1, 2, 3]);

        grid.dispatch(RowAction::Remove, id2).unwrap();
        assert_eq!(raw_ids(&grid), vec![1, 3]);
    }
}
