//! Explicit hide/show of indexes.

use std::collections::BTreeSet;

use tracing::debug;

use super::{shift_after_removal, Layer, LayerCommand, LayerEvent, PositionLookup, VisibilityCache};
use crate::error::{GridLayerError, Result};

/// Decorator that removes a set of hidden indexes from the underlying positions.
///
/// Hiding every index is allowed here and leaves an empty position space.
#[derive(Debug, Clone)]
pub struct HideShowLayer<L> {
    underlying: L,
    hidden: BTreeSet<usize>,
    cache: VisibilityCache,
}

impl<L: Layer> HideShowLayer<L> {
    pub fn new(underlying: L) -> Self {
        let cache = VisibilityCache::rebuild(&underlying, |_| false);
        Self {
            underlying,
            hidden: BTreeSet::new(),
            cache,
        }
    }

    pub fn underlying(&self) -> &L {
        &self.underlying
    }

    /// True if this layer hides `index`.
    pub fn is_index_hidden(&self, index: usize) -> bool {
        self.hidden.contains(&index)
    }

    /// Indexes hidden by this layer, ascending.
    pub fn hidden_indexes(&self) -> Vec<usize> {
        self.hidden.iter().copied().collect()
    }

    /// Hide indexes. Indexes that are not visible here are ignored, so
    /// repeating a hide changes nothing.
    pub fn hide_indexes(&mut self, indexes: &[usize]) -> LayerEvent {
        // positions before the hide, they shift afterwards
        let (positions, newly_hidden) = self.cache.visible_subset(indexes.iter().copied());
        if newly_hidden.is_empty() {
            return LayerEvent::VisualRefresh;
        }

        self.hidden.extend(newly_hidden.iter().copied());
        self.invalidate_cache();
        debug!(count = newly_hidden.len(), "indexes hidden");

        LayerEvent::HidePositions {
            positions,
            indexes: newly_hidden,
        }
    }

    /// Hide the indexes currently shown at `positions`.
    pub fn hide_positions(&mut self, positions: &[usize]) -> Result<LayerEvent> {
        let indexes = self.indexes_at(positions)?;
        Ok(self.hide_indexes(&indexes))
    }

    /// Show previously hidden indexes.
    pub fn show_indexes(&mut self, indexes: &[usize]) -> LayerEvent {
        let shown: Vec<usize> = indexes
            .iter()
            .copied()
            .filter(|index| self.hidden.remove(index))
            .collect();
        if shown.is_empty() {
            return LayerEvent::VisualRefresh;
        }

        self.invalidate_cache();
        debug!(count = shown.len(), "indexes shown");

        // positions after the show, that is where they become valid
        let (positions, indexes) = self.cache.visible_subset(shown);
        if positions.is_empty() {
            return LayerEvent::VisualRefresh;
        }
        LayerEvent::ShowPositions { positions, indexes }
    }

    /// Show the hidden run that follows each position and, with
    /// `include_adjacent`, the run that precedes it.
    pub fn show_positions(&mut self, positions: &[usize], include_adjacent: bool) -> Result<LayerEvent> {
        let mut to_show = BTreeSet::new();

        for index in self.indexes_at(positions)? {
            let Some(anchor) = self.underlying.position_by_index(index) else {
                continue;
            };

            let count = self.underlying.position_count();
            for underlying_position in anchor + 1..count {
                match self.underlying.index_by_position(underlying_position) {
                    Some(i) if self.hidden.contains(&i) => {
                        to_show.insert(i);
                    }
                    _ => break,
                }
            }

            if include_adjacent {
                for underlying_position in (0..anchor).rev() {
                    match self.underlying.index_by_position(underlying_position) {
                        Some(i) if self.hidden.contains(&i) => {
                            to_show.insert(i);
                        }
                        _ => break,
                    }
                }
            }
        }

        let to_show: Vec<usize> = to_show.into_iter().collect();
        Ok(self.show_indexes(&to_show))
    }

    /// Show everything hidden by this layer.
    pub fn show_all(&mut self) -> LayerEvent {
        let all = self.hidden_indexes();
        self.show_indexes(&all)
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
        self.cache = VisibilityCache::rebuild(&self.underlying, |index| hidden.contains(&index));
    }

    fn on_underlying_event(&mut self, event: LayerEvent) -> LayerEvent {
        if let LayerEvent::IndexesRemoved { indexes, .. } = &event {
            self.hidden = shift_after_removal(&self.hidden, indexes);
        }
        let stale = std::mem::take(&mut self.cache);
        self.invalidate_cache();
        stale.translate_event(&self.cache, event)
    }
}

impl<L: Layer> PositionLookup for HideShowLayer<L> {
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

impl<L: Layer> Layer for HideShowLayer<L> {
    fn underlying_position(&self, position: usize) -> Option<usize> {
        let index = self.cache.index_by_position(position)?;
        self.underlying.position_by_index(index)
    }

    fn do_command(&mut self, command: &LayerCommand) -> Result<Option<LayerEvent>> {
        match command {
            LayerCommand::Hide { positions } => self.hide_positions(positions).map(Some),
            LayerCommand::HideIndexes { indexes } => Ok(Some(self.hide_indexes(indexes))),
            LayerCommand::Show {
                positions,
                include_adjacent,
            } => self.show_positions(positions, *include_adjacent).map(Some),
            LayerCommand::ShowIndexes { indexes } => Ok(Some(self.show_indexes(indexes))),
            LayerCommand::ShowAll => Ok(Some(self.show_all())),
            _ => {
                let converted = command.convert_to_underlying(&*self)?;
                match self.underlying.do_command(&converted)? {
                    Some(event) => Ok(Some(self.on_underlying_event(event))),
                    None => Ok(None),
                }
            }
        }
    }
}
