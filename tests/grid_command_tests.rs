//! Grid command dispatch tests: one event per command, error recovery and
//! per-axis routing.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]

mod common;

use common::{grid_with_config, grid_with_log, hidden, single_layer_event};
use gridlayer::{
    Axis, CellCoord, GridCommand, GridConfig, GridEvent, GridLayerError, LayerCommand, LayerEvent, Selection,
};
use pretty_assertions::assert_eq;

#[test]
fn test_every_command_emits_exactly_one_event() {
    let (mut grid, log) = grid_with_log(10, 5);
    let g = grid.create_group(Axis::Row, "g", &[2, 3, 4], 0).unwrap();
    assert!(log.is_empty());

    let commands = [
        GridCommand::rows(LayerCommand::Hide { positions: vec![0] }),
        GridCommand::rows(LayerCommand::Collapse { groups: vec![g] }),
        GridCommand::rows(LayerCommand::Collapse { groups: vec![g] }),
        GridCommand::rows(LayerCommand::Expand { groups: vec![g] }),
        GridCommand::columns(LayerCommand::ShowAll),
        GridCommand::SelectCell { row: 0, column: 0 },
        GridCommand::ClearSelection,
    ];
    for command in &commands {
        grid.do_command(command).unwrap();
        assert_eq!(log.take().len(), 1, "{command:?}");
    }
}

#[test]
fn test_rows_and_columns_are_independent() {
    let (mut grid, log) = grid_with_log(6, 6);
    grid.do_command(&GridCommand::columns(LayerCommand::Hide { positions: vec![1, 2] }))
        .unwrap();

    assert_eq!(
        log.take(),
        vec![GridEvent::Layer {
            axis: Axis::Column,
            event: hidden(&[1, 2], &[1, 2]),
        }]
    );
    assert_eq!(grid.hidden_indexes(Axis::Column), vec![1, 2]);
    assert!(grid.hidden_indexes(Axis::Row).is_empty());
    assert_eq!(grid.position_count(Axis::Column), 4);
    assert_eq!(grid.index_by_position(Axis::Column, 1), Some(3));
}

#[test]
fn test_validation_error_emits_refresh_and_changes_nothing() {
    let (mut grid, log) = grid_with_log(6, 2);
    grid.create_group(Axis::Row, "a", &[1, 2], 0).unwrap();

    let result = grid.do_command(&GridCommand::rows(LayerCommand::CreateGroup {
        name: "b".to_string(),
        positions: vec![2, 3],
        level: 0,
    }));
    assert!(matches!(result, Err(GridLayerError::GroupOverlap { .. })));
    assert_eq!(single_layer_event(&log), LayerEvent::VisualRefresh);
    assert_eq!(grid.group_model(Axis::Row).len(), 1);
}

#[test]
fn test_not_collapseable_single_group_is_an_error() {
    let (mut grid, log) = grid_with_log(6, 2);
    let g = grid.create_group(Axis::Row, "fixed", &[1, 2], 0).unwrap();
    grid.do_command(&GridCommand::rows(LayerCommand::SetCollapseable {
        group: g,
        collapseable: false,
    }))
    .unwrap();
    log.take();

    let result = grid.do_command(&GridCommand::rows(LayerCommand::Collapse { groups: vec![g] }));
    assert!(matches!(result, Err(GridLayerError::NotCollapseable(_))));
    assert_eq!(single_layer_event(&log), LayerEvent::VisualRefresh);
    assert!(grid.hidden_indexes(Axis::Row).is_empty());
}

#[test]
fn test_refresh_can_be_suppressed() {
    let config = GridConfig {
        refresh_on_noop: false,
        ..GridConfig::new(4, 4)
    };
    let (mut grid, log) = grid_with_config(&config);

    grid.do_command(&GridCommand::rows(LayerCommand::ShowAll)).unwrap();
    assert!(grid
        .do_command(&GridCommand::rows(LayerCommand::Hide { positions: vec![8] }))
        .is_err());
    grid.do_command(&GridCommand::ClearSelection).unwrap();
    assert!(log.is_empty());

    grid.do_command(&GridCommand::rows(LayerCommand::Hide { positions: vec![0] }))
        .unwrap();
    assert_eq!(log.len(), 1);
}

#[test]
fn test_selection_is_stable_across_hide_and_show() {
    let (mut grid, _log) = grid_with_log(8, 3);
    grid.do_command(&GridCommand::SelectCell { row: 5, column: 2 }).unwrap();
    grid.do_command(&GridCommand::rows(LayerCommand::HideIndexes { indexes: vec![1, 2] }))
        .unwrap();

    assert_eq!(grid.selection(), Some(Selection::single(CellCoord::new(5, 2))));
    assert_eq!(grid.selection_positions(), Some(Selection::single(CellCoord::new(3, 2))));

    grid.do_command(&GridCommand::rows(LayerCommand::HideIndexes { indexes: vec![5] }))
        .unwrap();
    assert_eq!(grid.selection_positions(), None);

    grid.do_command(&GridCommand::rows(LayerCommand::ShowAll)).unwrap();
    assert_eq!(grid.selection_positions(), Some(Selection::single(CellCoord::new(5, 2))));
}

#[test]
fn test_select_out_of_range_keeps_selection() {
    let (mut grid, log) = grid_with_log(3, 3);
    grid.do_command(&GridCommand::SelectCell { row: 1, column: 1 }).unwrap();
    log.take();

    let result = grid.do_command(&GridCommand::SelectCell { row: 1, column: 9 });
    assert!(matches!(
        result,
        Err(GridLayerError::PositionOutOfRange { position: 9, count: 3 })
    ));
    assert_eq!(grid.selection(), Some(Selection::single(CellCoord::new(1, 1))));
    assert_eq!(log.len(), 1);
}

#[test]
fn test_remove_indexes_adjusts_selection_and_groups() {
    let (mut grid, log) = grid_with_log(10, 2);
    grid.create_group(Axis::Row, "g", &[6, 7, 8], 0).unwrap();
    grid.do_command(&GridCommand::SelectCell { row: 7, column: 1 }).unwrap();
    log.take();

    grid.do_command(&GridCommand::rows(LayerCommand::RemoveIndexes { indexes: vec![0, 1] }))
        .unwrap();
    assert_eq!(
        single_layer_event(&log),
        LayerEvent::IndexesRemoved {
            positions: vec![0, 1],
            indexes: vec![0, 1],
        }
    );
    assert_eq!(grid.index_count(Axis::Row), 8);
    assert_eq!(grid.selection(), Some(Selection::single(CellCoord::new(5, 1))));

    let g = grid.find_group(Axis::Row, "g").unwrap();
    assert_eq!(grid.group_model(Axis::Row).group(g).unwrap().members(), &[4, 5, 6]);
}

#[test]
fn test_removing_every_row_clears_selection() {
    let (mut grid, _log) = grid_with_log(2, 2);
    grid.do_command(&GridCommand::SelectCell { row: 0, column: 0 }).unwrap();
    grid.do_command(&GridCommand::rows(LayerCommand::RemoveIndexes { indexes: vec![0, 1] }))
        .unwrap();
    assert_eq!(grid.selection(), None);
    assert_eq!(grid.position_count(Axis::Row), 0);
}

#[test]
fn test_closure_sink_receives_events() {
    use std::cell::Cell;
    use std::rc::Rc;

    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    let (mut grid, _log) = grid_with_log(3, 3);
    grid.add_sink(move |_: &GridEvent| seen.set(seen.get() + 1));

    grid.do_command(&GridCommand::rows(LayerCommand::Hide { positions: vec![0] }))
        .unwrap();
    assert_eq!(count.get(), 1);
}
