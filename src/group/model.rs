//! Group membership model.
//!
//! Groups live in an arena and are addressed by [`GroupId`]. Every index maps
//! to at most one group per nesting level. The model never reads a layer on
//! its own: the owning layer calls [`GroupModel::refresh`] after each
//! structural change, which snapshots member positions and the per-group
//! visible-span caches.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

use crate::error::{GridLayerError, Result};
use crate::layer::{shift_index, PositionLookup};

new_key_type! { pub struct GroupId; }

/// A named, ordered set of indexes.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    level: usize,
    /// Insertion order is the canonical order
    members: Vec<usize>,
    static_indexes: BTreeSet<usize>,
    collapsed: bool,
    collapseable: bool,
    visible_start_index: Option<usize>,
    visible_start_position: Option<usize>,
    visible_span: usize,
}

impl Group {
    fn new(name: String, level: usize, members: Vec<usize>) -> Self {
        Self {
            name,
            level,
            members,
            static_indexes: BTreeSet::new(),
            collapsed: false,
            collapseable: true,
            visible_start_index: None,
            visible_start_position: None,
            visible_span: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nesting level, 0 is the outermost.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Member indexes in insertion order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    /// Members that collapse never hides.
    pub fn static_indexes(&self) -> &BTreeSet<usize> {
        &self.static_indexes
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_collapseable(&self) -> bool {
        self.collapseable
    }

    /// Index of the visible member with the lowest position.
    pub fn visible_start_index(&self) -> Option<usize> {
        self.visible_start_index
    }

    /// Lowest position of a visible member.
    pub fn visible_start_position(&self) -> Option<usize> {
        self.visible_start_position
    }

    /// Number of currently visible members.
    pub fn visible_span(&self) -> usize {
        self.visible_span
    }

    /// Total member count, independent of hiding.
    pub fn original_span(&self) -> usize {
        self.members.len()
    }
}

/// Ownership structure for groups of one axis.
#[derive(Debug, Clone, Default)]
pub struct GroupModel {
    groups: SlotMap<GroupId, Group>,
    /// `by_level[level][index]` = owning group
    by_level: Vec<HashMap<usize, GroupId>>,
    /// Positions of visible members, from the last refresh
    member_positions: HashMap<usize, usize>,
    position_members: BTreeMap<usize, usize>,
}

impl GroupModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Add a top-level group.
    pub fn add_group(&mut self, name: &str, indexes: &[usize]) -> Result<GroupId> {
        self.add_group_at_level(name, indexes, 0)
    }

    /// Add a group at `level`.
    ///
    /// Fails with [`GridLayerError::GroupOverlap`] if one of the indexes
    /// already belongs to a group at the same level. Duplicate indexes are
    /// collapsed onto their first occurrence.
    pub fn add_group_at_level(&mut self, name: &str, indexes: &[usize], level: usize) -> Result<GroupId> {
        let members = dedup_in_order(indexes);
        if members.is_empty() {
            return Err(GridLayerError::EmptyGroup);
        }
        self.check_overlap(&members, level)?;

        let id = self.groups.insert(Group::new(name.to_string(), level, members.clone()));
        if self.by_level.len() <= level {
            self.by_level.resize_with(level + 1, HashMap::new);
        }
        if let Some(owners) = self.by_level.get_mut(level) {
            owners.extend(members.iter().map(|&index| (index, id)));
        }
        debug!(group = name, level, members = members.len(), "group added");
        Ok(id)
    }

    /// Detach a group and all its members.
    ///
    /// Indexes hidden on behalf of the group are not shown here; the caller
    /// has to issue the show.
    pub fn remove_group(&mut self, id: GroupId) -> Option<Group> {
        let group = self.groups.remove(id)?;
        if let Some(owners) = self.by_level.get_mut(group.level) {
            for index in &group.members {
                owners.remove(index);
            }
        }
        debug!(group = group.name.as_str(), "group removed");
        Some(group)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.groups.iter()
    }

    /// First group with the given name, any level.
    pub fn find_by_name(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(_, group)| group.name == name)
            .map(|(id, _)| id)
    }

    /// Top-level group containing `index`.
    pub fn group_by_index(&self, index: usize) -> Option<GroupId> {
        self.group_by_index_at_level(index, 0)
    }

    pub fn group_by_index_at_level(&self, index: usize, level: usize) -> Option<GroupId> {
        self.by_level.get(level)?.get(&index).copied()
    }

    /// Top-level group containing the member visible at `position`.
    pub fn group_by_position(&self, position: usize) -> Option<GroupId> {
        let index = self.index_by_position(position)?;
        self.group_by_index(index)
    }

    /// Position of a member index as of the last refresh.
    ///
    /// `None` when the index is hidden or not part of any group.
    pub fn position_by_index(&self, index: usize) -> Option<usize> {
        self.member_positions.get(&index).copied()
    }

    /// Member index visible at `position` as of the last refresh.
    pub fn index_by_position(&self, position: usize) -> Option<usize> {
        self.position_members.get(&position).copied()
    }

    /// Members of `id` that currently have a position, in position order.
    pub fn visible_indexes(&self, id: GroupId) -> Vec<usize> {
        let Some(group) = self.groups.get(id) else {
            return Vec::new();
        };
        let mut visible: Vec<(usize, usize)> = group
            .members
            .iter()
            .filter_map(|&index| self.position_by_index(index).map(|p| (p, index)))
            .collect();
        visible.sort_unstable();
        visible.into_iter().map(|(_, index)| index).collect()
    }

    pub fn rename(&mut self, id: GroupId, name: &str) -> Result<()> {
        let group = self.groups.get_mut(id).ok_or(GridLayerError::UnknownGroup)?;
        group.name = name.to_string();
        Ok(())
    }

    pub fn set_collapseable(&mut self, id: GroupId, collapseable: bool) -> Result<()> {
        let group = self.groups.get_mut(id).ok_or(GridLayerError::UnknownGroup)?;
        group.collapseable = collapseable;
        Ok(())
    }

    pub(crate) fn set_collapsed(&mut self, id: GroupId, collapsed: bool) {
        if let Some(group) = self.groups.get_mut(id) {
            group.collapsed = collapsed;
        }
    }

    /// Mark members as static.
    ///
    /// Additive only: a member that is already hidden stays hidden until the
    /// group is expanded and collapsed again.
    pub fn add_static_indexes(&mut self, id: GroupId, indexes: &[usize]) -> Result<()> {
        let group = self.groups.get_mut(id).ok_or(GridLayerError::UnknownGroup)?;
        if let Some(&index) = indexes.iter().find(|i| !group.members.contains(i)) {
            return Err(GridLayerError::NotAMember {
                index,
                group: group.name.clone(),
            });
        }
        group.static_indexes.extend(indexes.iter().copied());
        Ok(())
    }

    /// Append members to an existing group. Returns the indexes actually added.
    pub fn add_members(&mut self, id: GroupId, indexes: &[usize]) -> Result<Vec<usize>> {
        let group = self.groups.get(id).ok_or(GridLayerError::UnknownGroup)?;
        let level = group.level;
        let added: Vec<usize> = dedup_in_order(indexes)
            .into_iter()
            .filter(|index| !group.members.contains(index))
            .collect();
        self.check_overlap(&added, level)?;

        if let Some(group) = self.groups.get_mut(id) {
            group.members.extend(added.iter().copied());
        }
        if let Some(owners) = self.by_level.get_mut(level) {
            owners.extend(added.iter().map(|&index| (index, id)));
        }
        Ok(added)
    }

    /// Purge deleted indexes and shift the rest down.
    ///
    /// Groups left without members are dropped; their ids are returned.
    pub(crate) fn remove_indexes(&mut self, removed: &[usize]) -> Vec<GroupId> {
        let mut emptied = Vec::new();
        for (id, group) in self.groups.iter_mut() {
            group.members = group
                .members
                .iter()
                .filter_map(|&index| shift_index(index, removed))
                .collect();
            group.static_indexes = group
                .static_indexes
                .iter()
                .filter_map(|&index| shift_index(index, removed))
                .collect();
            if group.members.is_empty() {
                emptied.push(id);
            }
        }
        for &id in &emptied {
            self.groups.remove(id);
        }

        self.by_level.clear();
        for (id, group) in &self.groups {
            if self.by_level.len() <= group.level {
                self.by_level.resize_with(group.level + 1, HashMap::new);
            }
            if let Some(owners) = self.by_level.get_mut(group.level) {
                owners.extend(group.members.iter().map(|&index| (index, id)));
            }
        }
        emptied
    }

    /// Re-read member positions from `lookup` and update the visible-span caches.
    pub fn refresh(&mut self, lookup: &dyn PositionLookup) {
        self.member_positions.clear();
        self.position_members.clear();

        for group in self.groups.values_mut() {
            let mut start: Option<(usize, usize)> = None;
            let mut span = 0;
            for &index in &group.members {
                let Some(position) = lookup.position_by_index(index) else {
                    continue;
                };
                span += 1;
                self.member_positions.insert(index, position);
                self.position_members.insert(position, index);
                if start.map_or(true, |(p, _)| position < p) {
                    start = Some((position, index));
                }
            }
            group.visible_start_position = start.map(|(p, _)| p);
            group.visible_start_index = start.map(|(_, i)| i);
            group.visible_span = span;
        }
        trace!(groups = self.groups.len(), "group model refreshed");
    }

    fn check_overlap(&self, indexes: &[usize], level: usize) -> Result<()> {
        let Some(owners) = self.by_level.get(level) else {
            return Ok(());
        };
        for index in indexes {
            if let Some(owner) = owners.get(index) {
                let group = self
                    .groups
                    .get(*owner)
                    .map(|g| g.name.clone())
                    .unwrap_or_default();
                return Err(GridLayerError::GroupOverlap { index: *index, group });
            }
        }
        Ok(())
    }
}

fn dedup_in_order(indexes: &[usize]) -> Vec<usize> {
    let mut seen = BTreeSet::new();
    indexes.iter().copied().filter(|i| seen.insert(*i)).collect()
}
