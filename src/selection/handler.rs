use tracing::trace;

use super::traversal::{move_to_boundary, next_cell, TraversalSpace};
use super::TraversalStrategy;
use crate::types::{MoveDirection, Selection};

/// Request to move the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSelectionCommand {
    pub direction: MoveDirection,
    /// Replaces the handler strategy entirely.
    pub strategy: Option<TraversalStrategy>,
    /// Replaces only the step count of the handler strategy.
    pub step_size: Option<usize>,
    /// Extend the selection instead of moving it.
    pub shift: bool,
    /// Jump to the border of the moved axis.
    pub ctrl: bool,
}

impl MoveSelectionCommand {
    pub fn new(direction: MoveDirection) -> Self {
        Self {
            direction,
            strategy: None,
            step_size: None,
            shift: false,
            ctrl: false,
        }
    }

    pub fn with_strategy(mut self, strategy: TraversalStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_step_size(mut self, step_size: usize) -> Self {
        self.step_size = Some(step_size);
        self
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }
}

/// Applies [`MoveSelectionCommand`]s with a configured default strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveSelectionHandler {
    strategy: TraversalStrategy,
}

impl MoveSelectionHandler {
    pub fn new(strategy: TraversalStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> TraversalStrategy {
        self.strategy
    }

    /// Strategy for one command.
    ///
    /// A strategy carried by the command wins. A bare step size keeps the
    /// configured scope and cycle flag. Otherwise the configured strategy.
    pub fn resolve_strategy(&self, command: &MoveSelectionCommand) -> TraversalStrategy {
        match (command.strategy, command.step_size) {
            (Some(strategy), _) => strategy,
            (None, Some(step_size)) => self.strategy.with_step_count(step_size),
            (None, None) => self.strategy,
        }
    }

    /// Move or extend `selection` inside `space`.
    pub fn move_selection(
        &self,
        space: &dyn TraversalSpace,
        selection: Selection,
        command: &MoveSelectionCommand,
    ) -> Selection {
        let from = selection.last_selected;
        let target = if command.ctrl {
            move_to_boundary(space, from, command.direction)
        } else {
            next_cell(space, from, command.direction, &self.resolve_strategy(command))
        };
        trace!(?from, ?target, direction = ?command.direction, "selection moved");

        if command.shift {
            let mut extended = selection;
            extended.extend_to(target);
            extended
        } else {
            Selection::single(target)
        }
    }
}
