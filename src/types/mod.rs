//! Plain data types shared by the layer stacks and the selection engine.

mod axis;
mod selection;

pub use axis::*;
pub use selection::*;
