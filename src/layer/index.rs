use tracing::debug;

use super::{Layer, LayerCommand, LayerEvent, PositionLookup};
use crate::error::Result;

/// Leaf of every stack: a flat index space `0..len` where position == index.
#[derive(Debug, Clone)]
pub struct IndexPositionLayer {
    len: usize,
}

impl IndexPositionLayer {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    /// Number of indexes in the space.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Delete indexes from the space; higher indexes move down.
    ///
    /// Out-of-range and duplicate indexes are ignored. Returns a refresh when
    /// nothing was removed.
    pub fn remove_indexes(&mut self, indexes: &[usize]) -> LayerEvent {
        let mut removed: Vec<usize> = indexes.iter().copied().filter(|&i| i < self.len).collect();
        removed.sort_unstable();
        removed.dedup();

        if removed.is_empty() {
            return LayerEvent::VisualRefresh;
        }

        self.len -= removed.len();
        debug!(count = removed.len(), len = self.len, "indexes removed");
        LayerEvent::IndexesRemoved {
            positions: removed.clone(),
            indexes: removed,
        }
    }
}

impl PositionLookup for IndexPositionLayer {
    fn position_count(&self) -> usize {
        self.len
    }

    fn index_by_position(&self, position: usize) -> Option<usize> {
        (position < self.len).then_some(position)
    }

    fn position_by_index(&self, index: usize) -> Option<usize> {
        (index < self.len).then_some(index)
    }
}

impl Layer for IndexPositionLayer {
    fn underlying_position(&self, position: usize) -> Option<usize> {
        self.index_by_position(position)
    }

    fn do_command(&mut self, command: &LayerCommand) -> Result<Option<LayerEvent>> {
        match command {
            LayerCommand::RemoveIndexes { indexes } => Ok(Some(self.remove_indexes(indexes))),
            _ => Ok(None),
        }
    }
}
