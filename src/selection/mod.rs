//! Selection movement: traversal strategies, the traversal engine and the
//! move-selection command handler.

mod handler;
mod strategy;
mod traversal;

pub use handler::{MoveSelectionCommand, MoveSelectionHandler};
pub use strategy::{TraversalScope, TraversalStrategy};
pub use traversal::{move_to_boundary, next_cell, TraversalSpace};
