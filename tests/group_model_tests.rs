//! Group model tests: membership, levels, lookups and static members.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]

mod common;

use gridlayer::{GridLayerError, GroupModel, HideShowLayer, IndexPositionLayer};
use pretty_assertions::assert_eq;

#[test]
fn test_overlap_at_same_level_is_rejected() {
    let mut model = GroupModel::new();
    model.add_group("a", &[1, 2, 3]).unwrap();
    let err = model.add_group("b", &[3, 4]).unwrap_err();
    match err {
        GridLayerError::GroupOverlap { index, group } => {
            assert_eq!(index, 3);
            assert_eq!(group, "a");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(model.len(), 1);
}

#[test]
fn test_nested_levels_may_overlap() {
    let mut model = GroupModel::new();
    let outer = model.add_group_at_level("outer", &[0, 1, 2, 3, 4], 0).unwrap();
    let inner = model.add_group_at_level("inner", &[2, 3], 1).unwrap();
    assert_eq!(model.group_by_index(2), Some(outer));
    assert_eq!(model.group_by_index_at_level(2, 1), Some(inner));
    assert_eq!(model.group_by_index_at_level(0, 1), None);
}

#[test]
fn test_empty_group_is_rejected() {
    let mut model = GroupModel::new();
    assert!(matches!(model.add_group("e", &[]), Err(GridLayerError::EmptyGroup)));
}

#[test]
fn test_lookup_by_name_and_rename() {
    let mut model = GroupModel::new();
    let g = model.add_group("old", &[1]).unwrap();
    assert_eq!(model.find_by_name("old"), Some(g));
    model.rename(g, "new").unwrap();
    assert_eq!(model.find_by_name("old"), None);
    assert_eq!(model.group(g).unwrap().name(), "new");
}

#[test]
fn test_refresh_snapshots_member_positions() {
    let mut model = GroupModel::new();
    let g = model.add_group("g", &[4, 2, 3]).unwrap();

    let mut layer = HideShowLayer::new(IndexPositionLayer::new(8));
    layer.hide_indexes(&[0, 3]);
    model.refresh(&layer);

    // visible: 1 2 4 5 6 7
    assert_eq!(model.position_by_index(2), Some(1));
    assert_eq!(model.position_by_index(3), None);
    assert_eq!(model.position_by_index(4), Some(2));
    assert_eq!(model.index_by_position(2), Some(4));
    assert_eq!(model.group_by_position(1), Some(g));
    assert_eq!(model.group_by_position(0), None);

    let group = model.group(g).unwrap();
    assert_eq!(group.visible_start_index(), Some(2));
    assert_eq!(group.visible_start_position(), Some(1));
    assert_eq!(group.visible_span(), 2);
    assert_eq!(model.visible_indexes(g), vec![2, 4]);
}

#[test]
fn test_remove_group_detaches_members() {
    let mut model = GroupModel::new();
    let g = model.add_group("g", &[1, 2]).unwrap();
    let removed = model.remove_group(g).unwrap();
    assert_eq!(removed.name(), "g");
    assert_eq!(model.group_by_index(1), None);
    assert!(model.is_empty());
    // members are free again
    model.add_group("h", &[1, 2]).unwrap();
}

#[test]
fn test_static_indexes_must_be_members() {
    let mut model = GroupModel::new();
    let g = model.add_group("g", &[2, 3, 4]).unwrap();
    assert!(matches!(
        model.add_static_indexes(g, &[5]),
        Err(GridLayerError::NotAMember { index: 5, .. })
    ));
    model.add_static_indexes(g, &[4]).unwrap();
    model.add_static_indexes(g, &[3]).unwrap();
    let statics: Vec<usize> = model.group(g).unwrap().static_indexes().iter().copied().collect();
    assert_eq!(statics, vec![3, 4]);
}

#[test]
fn test_add_members_checks_overlap() {
    let mut model = GroupModel::new();
    let a = model.add_group("a", &[1, 2]).unwrap();
    model.add_group("b", &[5]).unwrap();
    assert_eq!(model.add_members(a, &[2, 3]).unwrap(), vec![3]);
    assert!(matches!(
        model.add_members(a, &[5]),
        Err(GridLayerError::GroupOverlap { index: 5, .. })
    ));
    assert_eq!(model.group(a).unwrap().members(), &[1, 2, 3]);
}

#[test]
fn test_unknown_group_after_removal() {
    let mut model = GroupModel::new();
    let g = model.add_group("g", &[1]).unwrap();
    model.remove_group(g);
    assert!(matches!(model.rename(g, "x"), Err(GridLayerError::UnknownGroup)));
    assert!(model.group(g).is_none());
}
