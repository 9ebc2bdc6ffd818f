use serde::{Deserialize, Serialize};

/// What happens when a movement crosses the border of the moved axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraversalScope {
    /// Stay on the same row/column; cycling wraps within it.
    Axis,
    /// Continue on the next row/column; cycling wraps around the table.
    Table,
}

/// Immutable description of how a selection moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TraversalStrategy {
    scope: TraversalScope,
    cycle: bool,
    step_count: usize,
}

impl TraversalStrategy {
    /// One cell at a time, stop at the border. The default.
    pub const AXIS: Self = Self::new(TraversalScope::Axis, false, 1);
    /// One cell at a time, wrap to the start of the same row/column.
    pub const AXIS_CYCLE: Self = Self::new(TraversalScope::Axis, true, 1);
    /// One cell at a time, continue on the next row/column, stop at the table end.
    pub const TABLE: Self = Self::new(TraversalScope::Table, false, 1);
    /// One cell at a time, continue on the next row/column, wrap to the first cell.
    pub const TABLE_CYCLE: Self = Self::new(TraversalScope::Table, true, 1);

    /// A step count of zero is treated as one.
    pub const fn new(scope: TraversalScope, cycle: bool, step_count: usize) -> Self {
        Self {
            scope,
            cycle,
            step_count: if step_count == 0 { 1 } else { step_count },
        }
    }

    /// Same scope and cycle behavior with a different step count.
    pub const fn with_step_count(self, step_count: usize) -> Self {
        Self::new(self.scope, self.cycle, step_count)
    }

    pub fn scope(&self) -> TraversalScope {
        self.scope
    }

    pub fn is_cycle(&self) -> bool {
        self.cycle
    }

    pub fn step_count(&self) -> usize {
        self.step_count.max(1)
    }
}

impl Default for TraversalStrategy {
    fn default() -> Self {
        Self::AXIS
    }
}
