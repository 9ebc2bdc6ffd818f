//! Layer stack for one grid axis.
//!
//! A stack is a chain of decorators over a flat index space:
//!
//! ```text
//! GroupExpandCollapseLayer   positions with collapsed group members removed
//!   | HideShowLayer          positions with explicitly hidden indexes removed
//! IndexPositionLayer         positions == indexes (0..len)
//! ```
//!
//! Each layer exposes its own position space through [`PositionLookup`].
//! Commands enter at the top and descend through [`Layer::do_command`]; a layer
//! that does not own the command re-expresses its positional payload in the
//! coordinates of the layer below and delegates. The event produced by the
//! handling layer travels back up and every decorator translates it into its
//! own positions before returning it.

mod command;
mod event;
mod hide_show;
mod index;
mod visibility;

pub use command::LayerCommand;
pub use event::LayerEvent;
pub use hide_show::HideShowLayer;
pub use index::IndexPositionLayer;

pub(crate) use visibility::{shift_after_removal, shift_index, VisibilityCache};

use crate::error::Result;

/// Read-only position/index mapping of one coordinate space.
///
/// Lookup misses (hidden or unknown entries, out-of-range positions) are
/// reported as `None`; callers must check.
pub trait PositionLookup {
    /// Number of positions in this space.
    fn position_count(&self) -> usize;

    /// Index shown at `position`.
    fn index_by_position(&self, position: usize) -> Option<usize>;

    /// Position of `index`, `None` when the index is hidden or unknown.
    fn position_by_index(&self, index: usize) -> Option<usize>;

    /// Positions of all given indexes that are currently visible, ascending.
    fn positions_by_indexes(&self, indexes: &[usize]) -> Vec<usize> {
        let mut positions: Vec<usize> = indexes
            .iter()
            .filter_map(|&index| self.position_by_index(index))
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }

    /// All visible indexes in position order.
    fn visible_indexes(&self) -> Vec<usize> {
        (0..self.position_count())
            .filter_map(|position| self.index_by_position(position))
            .collect()
    }
}

/// A layer in an axis stack.
pub trait Layer: PositionLookup {
    /// Position in the layer directly beneath for a position of this layer.
    ///
    /// The leaf has no underlying layer and maps positions onto themselves.
    fn underlying_position(&self, position: usize) -> Option<usize>;

    /// Handle `command` or pass it down.
    ///
    /// Positions carried by `command` are expressed in this layer's space.
    /// Returns `Ok(None)` when no layer in the chain owns the command and
    /// `Ok(Some(event))` with the event in this layer's coordinates otherwise.
    fn do_command(&mut self, command: &LayerCommand) -> Result<Option<LayerEvent>>;
}
