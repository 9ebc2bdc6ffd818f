//! Cached position/index mapping shared by the hide/show decorators.
//!
//! Both decorators present "the underlying positions minus some hidden
//! indexes". The mapping is rebuilt eagerly after every mutation so queries
//! stay `&self` and O(1).

use std::collections::{BTreeSet, HashMap};

use super::{LayerEvent, PositionLookup};

/// Position/index bijection of a layer that skips hidden indexes.
#[derive(Debug, Clone, Default)]
pub(crate) struct VisibilityCache {
    /// `indexes[position]` = index shown at that position
    indexes: Vec<usize>,
    /// Reverse lookup for visible indexes only
    positions: HashMap<usize, usize>,
}

impl VisibilityCache {
    /// Walk the underlying positions in order, skipping indexes for which
    /// `is_hidden` returns true.
    pub(crate) fn rebuild<L, F>(underlying: &L, is_hidden: F) -> Self
    where
        L: PositionLookup + ?Sized,
        F: Fn(usize) -> bool,
    {
        let count = underlying.position_count();
        let mut indexes = Vec::with_capacity(count);
        let mut positions = HashMap::with_capacity(count);

        for underlying_position in 0..count {
            let Some(index) = underlying.index_by_position(underlying_position) else {
                continue;
            };
            if is_hidden(index) {
                continue;
            }
            positions.insert(index, indexes.len());
            indexes.push(index);
        }

        Self { indexes, positions }
    }

    /// Translate an event raised beneath into this layer's coordinates.
    ///
    /// `self` must be the cache from before the underlying change and `fresh`
    /// the cache rebuilt after it: hide and removal positions are taken from
    /// the old mapping, show positions from the new one.
    pub(crate) fn translate_event(&self, fresh: &VisibilityCache, event: LayerEvent) -> LayerEvent {
        match event {
            LayerEvent::HidePositions { indexes, .. } => {
                let (positions, indexes) = self.visible_subset(indexes);
                if positions.is_empty() {
                    LayerEvent::VisualRefresh
                } else {
                    LayerEvent::HidePositions { positions, indexes }
                }
            }
            LayerEvent::ShowPositions { indexes, .. } => {
                let (positions, indexes) = fresh.visible_subset(indexes);
                if positions.is_empty() {
                    LayerEvent::VisualRefresh
                } else {
                    LayerEvent::ShowPositions { positions, indexes }
                }
            }
            LayerEvent::IndexesRemoved { indexes, .. } => LayerEvent::IndexesRemoved {
                positions: self.positions_by_indexes(&indexes),
                indexes,
            },
            LayerEvent::VisualRefresh => LayerEvent::VisualRefresh,
        }
    }

    /// Split `indexes` into the ascending positions and indexes of those visible here.
    pub(crate) fn visible_subset<I>(&self, indexes: I) -> (Vec<usize>, Vec<usize>)
    where
        I: IntoIterator<Item = usize>,
    {
        let mut pairs: Vec<(usize, usize)> = indexes
            .into_iter()
            .filter_map(|index| self.position_by_index(index).map(|p| (p, index)))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();

        let positions = pairs.iter().map(|&(p, _)| p).collect();
        let mut indexes: Vec<usize> = pairs.into_iter().map(|(_, i)| i).collect();
        indexes.sort_unstable();
        (positions, indexes)
    }
}

impl PositionLookup for VisibilityCache {
    fn position_count(&self) -> usize {
        self.indexes.len()
    }

    fn index_by_position(&self, position: usize) -> Option<usize> {
        self.indexes.get(position).copied()
    }

    fn position_by_index(&self, index: usize) -> Option<usize> {
        self.positions.get(&index).copied()
    }

    fn visible_indexes(&self) -> Vec<usize> {
        self.indexes.clone()
    }
}

/// Drop `removed` from `indexes` and close the gaps they leave.
///
/// Every surviving index moves down by the number of removed indexes below it.
/// `removed` must be sorted ascending.
pub(crate) fn shift_after_removal(indexes: &BTreeSet<usize>, removed: &[usize]) -> BTreeSet<usize> {
    indexes
        .iter()
        .filter_map(|&index| shift_index(index, removed))
        .collect()
}

/// New value of `index` after `removed` (sorted) were deleted, `None` if it was deleted itself.
pub(crate) fn shift_index(index: usize, removed: &[usize]) -> Option<usize> {
    if removed.binary_search(&index).is_ok() {
        return None;
    }
    let below = removed.partition_point(|&r| r < index);
    Some(index - below)
}
