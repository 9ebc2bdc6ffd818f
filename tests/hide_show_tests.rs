//! Hide/show layer tests: position mapping, event coordinates and structural removal.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]

mod common;

use common::{hidden, shown};
use gridlayer::{GridLayerError, HideShowLayer, IndexPositionLayer, Layer, LayerCommand, LayerEvent, PositionLookup};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn layer(len: usize) -> HideShowLayer<IndexPositionLayer> {
    HideShowLayer::new(IndexPositionLayer::new(len))
}

#[test]
fn test_hide_reports_positions_before_the_hide() {
    let mut l = layer(10);
    assert_eq!(l.hide_indexes(&[2, 3]), hidden(&[2, 3], &[2, 3]));

    // position 2 now shows index 4
    let event = l.hide_positions(&[2]).unwrap();
    assert_eq!(event, hidden(&[2], &[4]));
    assert_eq!(l.hidden_indexes(), vec![2, 3, 4]);
    assert_eq!(l.visible_indexes(), vec![0, 1, 5, 6, 7, 8, 9]);
}

#[test]
fn test_hide_is_idempotent() {
    let mut l = layer(5);
    l.hide_indexes(&[1]);
    assert_eq!(l.hide_indexes(&[1]), LayerEvent::VisualRefresh);
    assert_eq!(l.position_count(), 4);
}

#[test]
fn test_show_reports_positions_after_the_show() {
    let mut l = layer(10);
    l.hide_indexes(&[2, 3, 4]);
    assert_eq!(l.show_indexes(&[3]), shown(&[2], &[3]));
    assert_eq!(l.index_by_position(2), Some(3));
    assert_eq!(l.position_by_index(2), None);
}

#[test]
fn test_show_of_visible_index_is_refresh() {
    let mut l = layer(4);
    assert_eq!(l.show_indexes(&[0]), LayerEvent::VisualRefresh);
}

#[test]
fn test_show_reveals_run_after_position() {
    let mut l = layer(10);
    l.hide_indexes(&[3, 4, 6]);
    // visible: 0 1 2 5 7 8 9, position 3 is index 5
    let event = l.show_positions(&[3], false).unwrap();
    assert_eq!(event, shown(&[4], &[6]));
    assert_eq!(l.hidden_indexes(), vec![3, 4]);
}

#[test]
fn test_show_adjacent_reveals_both_runs() {
    let mut l = layer(10);
    l.hide_indexes(&[3, 4, 6]);
    let event = l.show_positions(&[3], true).unwrap();
    assert_eq!(event, shown(&[3, 4, 6], &[3, 4, 6]));
    assert!(l.hidden_indexes().is_empty());
}

#[test]
fn test_show_all() {
    let mut l = layer(6);
    l.hide_indexes(&[0, 5]);
    assert_eq!(l.show_all(), shown(&[0, 5], &[0, 5]));
    assert_eq!(l.show_all(), LayerEvent::VisualRefresh);
}

#[test]
fn test_hiding_everything_leaves_empty_space() {
    let mut l = layer(3);
    l.hide_indexes(&[0, 1, 2]);
    assert_eq!(l.position_count(), 0);
    assert_eq!(l.index_by_position(0), None);
}

#[test]
fn test_out_of_range_position_changes_nothing() {
    let mut l = layer(3);
    let result = l.do_command(&LayerCommand::Hide { positions: vec![1, 7] });
    assert!(matches!(
        result,
        Err(GridLayerError::PositionOutOfRange { position: 7, count: 3 })
    ));
    assert!(l.hidden_indexes().is_empty());
}

#[test_case(&[] ; "nothing hidden")]
#[test_case(&[0] ; "first hidden")]
#[test_case(&[1, 2, 3] ; "run hidden")]
#[test_case(&[0, 2, 4, 6, 8] ; "every other hidden")]
#[test_case(&[9] ; "last hidden")]
fn test_position_index_round_trip(hide: &[usize]) {
    let mut l = layer(10);
    l.hide_indexes(hide);
    for index in 0..10 {
        match l.position_by_index(index) {
            Some(position) => assert_eq!(l.index_by_position(position), Some(index)),
            None => assert!(hide.contains(&index)),
        }
    }
    assert_eq!(l.position_count(), 10 - hide.len());
}

#[test]
fn test_remove_indexes_shifts_hidden_set() {
    let mut l = layer(8);
    l.hide_indexes(&[5]);
    let event = l
        .do_command(&LayerCommand::RemoveIndexes { indexes: vec![2] })
        .unwrap()
        .unwrap();
    assert_eq!(
        event,
        LayerEvent::IndexesRemoved {
            positions: vec![2],
            indexes: vec![2],
        }
    );
    assert_eq!(l.hidden_indexes(), vec![4]);
    assert_eq!(l.visible_indexes(), vec![0, 1, 2, 3, 5, 6]);
}

#[test]
fn test_remove_hidden_index_has_no_position() {
    let mut l = layer(5);
    l.hide_indexes(&[1]);
    let event = l
        .do_command(&LayerCommand::RemoveIndexes { indexes: vec![1] })
        .unwrap()
        .unwrap();
    assert_eq!(event.positions(), &[] as &[usize]);
    assert_eq!(event.indexes(), &[1]);
    assert!(l.hidden_indexes().is_empty());
    assert_eq!(l.position_count(), 4);
}

#[test]
fn test_group_commands_are_not_handled_here() {
    let mut l = layer(5);
    let result = l.do_command(&LayerCommand::Collapse { groups: Vec::new() }).unwrap();
    assert_eq!(result, None);
}
