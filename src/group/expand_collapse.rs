//! Expand/collapse of groups on top of the hide/show contract.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::{Group, GroupId, GroupModel};
use crate::error::{GridLayerError, Result};
use crate::layer::{shift_after_removal, Layer, LayerCommand, LayerEvent, PositionLookup, VisibilityCache};

/// Layer that hides collapsed group members.
///
/// Owns the [`GroupModel`] of its axis and a hidden set per collapsed group.
/// A group is never hidden completely: without static members its visible
/// start index stays, otherwise all static members stay.
#[derive(Debug, Clone)]
pub struct GroupExpandCollapseLayer<L> {
    underlying: L,
    model: GroupModel,
    hidden: HashMap<GroupId, BTreeSet<usize>>,
    cache: VisibilityCache,
}

impl<L: Layer> GroupExpandCollapseLayer<L> {
    pub fn new(underlying: L) -> Self {
        let cache = VisibilityCache::rebuild(&underlying, |_| false);
        Self {
            underlying,
            model: GroupModel::new(),
            hidden: HashMap::new(),
            cache,
        }
    }

    pub fn underlying(&self) -> &L {
        &self.underlying
    }

    pub fn group_model(&self) -> &GroupModel {
        &self.model
    }

    /// True if any collapsed group hides `index`.
    pub fn is_index_hidden(&self, index: usize) -> bool {
        self.hidden.values().any(|indexes| indexes.contains(&index))
    }

    /// Union of all indexes hidden by collapsed groups, ascending.
    pub fn hidden_indexes(&self) -> Vec<usize> {
        let all: BTreeSet<usize> = self.hidden.values().flatten().copied().collect();
        all.into_iter().collect()
    }

    /// Indexes hidden on behalf of one group.
    pub fn hidden_indexes_of(&self, id: GroupId) -> Option<&BTreeSet<usize>> {
        self.hidden.get(&id)
    }

    /// Create a group from indexes and return its handle.
    pub fn add_group(&mut self, name: &str, indexes: &[usize], level: usize) -> Result<GroupId> {
        let id = self.model.add_group_at_level(name, indexes, level)?;
        self.model.refresh(&self.cache);
        Ok(id)
    }

    /// Collapse a batch of groups.
    ///
    /// Groups are processed by descending visible start position. All event
    /// positions refer to the state before the batch.
    pub fn collapse(&mut self, groups: &[GroupId]) -> LayerEvent {
        let mut batch: Vec<(Option<usize>, GroupId)> = dedup_ids(groups)
            .into_iter()
            .filter_map(|id| self.model.group(id).map(|g| (g.visible_start_position(), id)))
            .collect();
        batch.sort_by(|a, b| b.0.cmp(&a.0));

        let mut hidden_positions = BTreeSet::new();
        let mut hidden_indexes = BTreeSet::new();

        for (_, id) in batch {
            let Some(group) = self.model.group(id) else {
                continue;
            };
            if !group.is_collapseable() {
                debug!(group = group.name(), "collapse skipped, group not collapseable");
                continue;
            }

            let mut indexes: BTreeSet<usize> = if !group.is_collapsed() {
                self.model.visible_indexes(id).into_iter().collect()
            } else if !self.hidden.contains_key(&id) {
                // collapsed flag without a hidden set, e.g. restored state
                group
                    .members()
                    .iter()
                    .copied()
                    .filter(|&index| self.model.position_by_index(index).is_some())
                    .collect()
            } else {
                continue;
            };

            retain_hideable(group, &mut indexes);
            let (positions, newly_hidden) = self.cache.visible_subset(indexes.iter().copied());
            hidden_positions.extend(positions);
            hidden_indexes.extend(newly_hidden);

            debug!(group = group.name(), hidden = indexes.len(), "group collapsed");
            self.model.set_collapsed(id, true);
            self.hidden.insert(id, indexes);
        }

        if hidden_positions.is_empty() {
            self.model.refresh(&self.cache);
            return LayerEvent::VisualRefresh;
        }

        self.invalidate_cache();
        LayerEvent::HidePositions {
            positions: hidden_positions.into_iter().collect(),
            indexes: hidden_indexes.into_iter().collect(),
        }
    }

    /// Expand a batch of groups, restoring what their collapse hid.
    pub fn expand(&mut self, groups: &[GroupId]) -> LayerEvent {
        let mut to_show = BTreeSet::new();

        for id in dedup_ids(groups) {
            let Some(group) = self.model.group(id) else {
                continue;
            };
            if !group.is_collapseable() || !group.is_collapsed() {
                continue;
            }
            debug!(group = group.name(), "group expanded");
            self.model.set_collapsed(id, false);
            if let Some(indexes) = self.hidden.remove(&id) {
                to_show.extend(indexes);
            }
        }

        if to_show.is_empty() {
            return LayerEvent::VisualRefresh;
        }

        self.invalidate_cache();
        let shown: Vec<usize> = to_show.into_iter().collect();
        let (positions, indexes) = self.cache.visible_subset(shown);
        if positions.is_empty() {
            // still hidden by another collapsed group
            return LayerEvent::VisualRefresh;
        }
        LayerEvent::ShowPositions { positions, indexes }
    }

    /// Adjust the hidden set of a group that stays collapsed.
    ///
    /// Rejected without effect once the visible members plus the hidden ones
    /// already account for the group's original span.
    pub fn update_collapsed_state(
        &mut self,
        id: GroupId,
        to_hide: &[usize],
        to_show: &[usize],
    ) -> Result<LayerEvent> {
        let group = self.model.group(id).ok_or(GridLayerError::UnknownGroup)?;
        let Some(hidden) = self.hidden.get(&id) else {
            debug!(group = group.name(), "update ignored, group holds no hidden set");
            return Ok(LayerEvent::VisualRefresh);
        };

        let visible = self.model.visible_indexes(id).len();
        if visible + hidden.len() >= group.original_span() {
            debug!(
                group = group.name(),
                visible,
                hidden = hidden.len(),
                span = group.original_span(),
                "update rejected, group would be under-counted"
            );
            return Ok(LayerEvent::VisualRefresh);
        }

        let mut hide: BTreeSet<usize> = to_hide.iter().copied().filter(|i| !hidden.contains(i)).collect();
        retain_hideable(group, &mut hide);
        let (positions, newly_hidden) = self.cache.visible_subset(hide.iter().copied());

        let mut shown = Vec::new();
        if let Some(hidden) = self.hidden.get_mut(&id) {
            hidden.extend(hide);
            shown = to_show.iter().copied().filter(|i| hidden.remove(i)).collect();
        }
        self.invalidate_cache();

        if !positions.is_empty() {
            return Ok(LayerEvent::HidePositions {
                positions,
                indexes: newly_hidden,
            });
        }
        let (positions, indexes) = self.cache.visible_subset(shown);
        if positions.is_empty() {
            Ok(LayerEvent::VisualRefresh)
        } else {
            Ok(LayerEvent::ShowPositions { positions, indexes })
        }
    }

    /// Add members to a group; a collapsed group hides them right away.
    pub fn add_group_members(&mut self, id: GroupId, indexes: &[usize]) -> Result<LayerEvent> {
        let added = self.model.add_members(id, indexes)?;
        self.model.refresh(&self.cache);

        let Some(group) = self.model.group(id) else {
            return Err(GridLayerError::UnknownGroup);
        };
        if !group.is_collapsed() || !self.hidden.contains_key(&id) {
            return Ok(LayerEvent::VisualRefresh);
        }

        let mut hide: BTreeSet<usize> = added.into_iter().collect();
        retain_hideable(group, &mut hide);
        let (positions, newly_hidden) = self.cache.visible_subset(hide.iter().copied());
        if let Some(hidden) = self.hidden.get_mut(&id) {
            hidden.extend(hide);
        }
        self.invalidate_cache();

        if positions.is_empty() {
            Ok(LayerEvent::VisualRefresh)
        } else {
            Ok(LayerEvent::HidePositions {
                positions,
                indexes: newly_hidden,
            })
        }
    }

    /// Expand the group, then drop it from the model.
    pub fn remove_group(&mut self, id: GroupId) -> Result<LayerEvent> {
        if self.model.group(id).is_none() {
            return Err(GridLayerError::UnknownGroup);
        }

        // collapseable is irrelevant here, nothing may stay hidden for a dead group
        let shown: Vec<usize> = self.hidden.remove(&id).map(|s| s.into_iter().collect()).unwrap_or_default();
        self.model.remove_group(id);
        self.invalidate_cache();

        let (positions, indexes) = self.cache.visible_subset(shown);
        if positions.is_empty() {
            Ok(LayerEvent::VisualRefresh)
        } else {
            Ok(LayerEvent::ShowPositions { positions, indexes })
        }
    }

    fn indexes_at(&self, positions: &[usize]) -> Result<Vec<usize>> {
        positions
            .iter()
            .map(|&position| {
                self.cache
                    .index_by_position(position)
                    .ok_or(GridLayerError::PositionOutOfRange {
                        position,
                        count: self.cache.position_count(),
                    })
            })
            .collect()
    }

    fn invalidate_cache(&mut self) {
        let hidden = &self.hidden;
        self.cache = VisibilityCache::rebuild(&self.underlying, |index| {
            hidden.values().any(|indexes| indexes.contains(&index))
        });
        self.model.refresh(&self.cache);
    }

    fn on_underlying_event(&mut self, event: LayerEvent) -> LayerEvent {
        if let LayerEvent::IndexesRemoved { indexes, .. } = &event {
            for id in self.model.remove_indexes(indexes) {
                self.hidden.remove(&id);
            }
            for set in self.hidden.values_mut() {
                *set = shift_after_removal(set, indexes);
            }
            self.reveal_keep_visible();
        }
        let stale = std::mem::take(&mut self.cache);
        self.invalidate_cache();
        stale.translate_event(&self.cache, event)
    }

    /// Un-hide the keep-visible members of collapsed groups left without a
    /// visible member, e.g. after their start index was removed.
    fn reveal_keep_visible(&mut self) {
        let ids: Vec<GroupId> = self.hidden.keys().copied().collect();
        for id in ids {
            let Some(group) = self.model.group(id) else {
                continue;
            };
            let keep: Vec<usize> = if group.static_indexes().is_empty() {
                let any_visible = group.members().iter().any(|&index| {
                    self.underlying.position_by_index(index).is_some() && !self.is_index_hidden(index)
                });
                if any_visible {
                    continue;
                }
                group
                    .members()
                    .iter()
                    .filter_map(|&index| self.underlying.position_by_index(index).map(|p| (p, index)))
                    .min()
                    .map(|(_, index)| index)
                    .into_iter()
                    .collect()
            } else {
                group.static_indexes().iter().copied().collect()
            };

            if let Some(hidden) = self.hidden.get_mut(&id) {
                for index in keep {
                    if hidden.remove(&index) {
                        debug!(index, "keep-visible member revealed after removal");
                    }
                }
            }
        }
    }

    fn require_group(&self, id: GroupId) -> Result<&Group> {
        self.model.group(id).ok_or(GridLayerError::UnknownGroup)
    }
}

impl<L: Layer> PositionLookup for GroupExpandCollapseLayer<L> {
    fn position_count(&self) -> usize {
        self.cache.position_count()
    }

    fn index_by_position(&self, position: usize) -> Option<usize> {
        self.cache.index_by_position(position)
    }

    fn position_by_index(&self, index: usize) -> Option<usize> {
        self.cache.position_by_index(index)
    }

    fn visible_indexes(&self) -> Vec<usize> {
        self.cache.visible_indexes()
    }
}

impl<L: Layer> Layer for GroupExpandCollapseLayer<L> {
    fn underlying_position(&self, position: usize) -> Option<usize> {
        let index = self.cache.index_by_position(position)?;
        self.underlying.position_by_index(index)
    }

    fn do_command(&mut self, command: &LayerCommand) -> Result<Option<LayerEvent>> {
        let event = match command {
            LayerCommand::Collapse { groups } => {
                if let [single] = groups.as_slice() {
                    let group = self.require_group(*single)?;
                    if !group.is_collapseable() {
                        return Err(GridLayerError::NotCollapseable(group.name().to_string()));
                    }
                }
                self.collapse(groups)
            }
            LayerCommand::Expand { groups } => {
                if let [single] = groups.as_slice() {
                    let group = self.require_group(*single)?;
                    if !group.is_collapseable() {
                        return Err(GridLayerError::NotCollapseable(group.name().to_string()));
                    }
                }
                self.expand(groups)
            }
            LayerCommand::UpdateCollapsedState {
                group,
                to_hide,
                to_show,
            } => self.update_collapsed_state(*group, to_hide, to_show)?,
            LayerCommand::CreateGroup {
                name,
                positions,
                level,
            } => {
                let indexes = self.indexes_at(positions)?;
                self.add_group(name, &indexes, *level)?;
                LayerEvent::VisualRefresh
            }
            LayerCommand::RemoveGroup { group } => self.remove_group(*group)?,
            LayerCommand::RenameGroup { group, name } => {
                self.model.rename(*group, name)?;
                LayerEvent::VisualRefresh
            }
            LayerCommand::SetCollapseable {
                group,
                collapseable,
            } => {
                self.model.set_collapseable(*group, *collapseable)?;
                LayerEvent::VisualRefresh
            }
            LayerCommand::AddStaticIndexes { group, indexes } => {
                self.model.add_static_indexes(*group, indexes)?;
                LayerEvent::VisualRefresh
            }
            LayerCommand::AddGroupMembers { group, positions } => {
                let indexes = self.indexes_at(positions)?;
                self.add_group_members(*group, &indexes)?
            }
            _ => {
                let converted = command.convert_to_underlying(&*self)?;
                return match self.underlying.do_command(&converted)? {
                    Some(event) => Ok(Some(self.on_underlying_event(event))),
                    None => Ok(None),
                };
            }
        };
        Ok(Some(event))
    }
}

/// Drop the members that must stay visible.
///
/// Without static members the visible start index stays; otherwise every
/// static member stays and the start index may be hidden.
fn retain_hideable(group: &Group, indexes: &mut BTreeSet<usize>) {
    if group.static_indexes().is_empty() {
        if let Some(start) = group.visible_start_index() {
            indexes.remove(&start);
        }
    } else {
        indexes.retain(|index| !group.static_indexes().contains(index));
    }
}

fn dedup_ids(groups: &[GroupId]) -> Vec<GroupId> {
    let mut ids = Vec::with_capacity(groups.len());
    for &id in groups {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
