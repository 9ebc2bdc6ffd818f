//! Row/column groups and their expand/collapse layer.

mod expand_collapse;
mod model;

pub use expand_collapse::GroupExpandCollapseLayer;
pub use model::{Group, GroupId, GroupModel};
