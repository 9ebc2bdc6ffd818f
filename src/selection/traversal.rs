//! Selection traversal over a grid with hidden rows and columns.
//!
//! The engine walks cell coordinates of a [`TraversalSpace`], counting only
//! visible cells as steps. What happens at the border of the moved axis is
//! decided by the [`TraversalStrategy`].

use super::{TraversalScope, TraversalStrategy};
use crate::types::{Axis, CellCoord, MoveDirection};

/// Two-dimensional coordinate space the engine moves in.
pub trait TraversalSpace {
    /// Number of positions along `axis`.
    fn extent(&self, axis: Axis) -> usize;

    /// True if the position on `axis` must be skipped.
    fn is_hidden(&self, axis: Axis, position: usize) -> bool;
}

/// Compute the cell reached by moving `strategy.step_count()` visible cells
/// from `from` in `direction`.
///
/// Without a visible cell to land on the result is the last visible cell
/// reached, or `from` itself.
pub fn next_cell(
    space: &dyn TraversalSpace,
    from: CellCoord,
    direction: MoveDirection,
    strategy: &TraversalStrategy,
) -> CellCoord {
    let axis = direction.axis();
    let cross = axis.other();
    let forward = direction.is_forward();
    let len = space.extent(axis);
    let cross_len = space.extent(cross);
    if len == 0 || cross_len == 0 {
        return from;
    }

    let mut along = coord(from, axis).min(len - 1);
    let mut line = coord(from, cross);
    let mut target = from;

    // the start may sit on a line hidden after it was selected
    if space.is_hidden(cross, line) {
        let Some(visible) = nearest_visible(space, cross, line) else {
            return from;
        };
        line = visible;
        target = with_coords(axis, along, line);
    }
    let mut remaining = strategy.step_count();

    // a full sweep of the table without a visible cell means there is none
    let sweep = len.saturating_mul(cross_len + 1).saturating_add(1);
    let mut misses = 0usize;

    while remaining > 0 {
        match step(along, len, forward) {
            Some(next) => along = next,
            None => match strategy.scope() {
                TraversalScope::Axis => {
                    if !strategy.is_cycle() {
                        break;
                    }
                    along = border(len, forward);
                }
                TraversalScope::Table => {
                    let next_line = next_visible(space, cross, line, forward).or_else(|| {
                        if strategy.is_cycle() {
                            first_visible(space, cross, forward)
                        } else {
                            None
                        }
                    });
                    let Some(next_line) = next_line else {
                        break;
                    };
                    line = next_line;
                    along = border(len, forward);
                }
            },
        }

        if space.is_hidden(axis, along) {
            misses += 1;
            if misses > sweep {
                break;
            }
            continue;
        }

        misses = 0;
        target = with_coords(axis, along, line);
        remaining -= 1;
    }

    target
}

/// Jump to the last (forward) or first (backward) visible position along the
/// moved axis, staying on the same row/column.
pub fn move_to_boundary(space: &dyn TraversalSpace, from: CellCoord, direction: MoveDirection) -> CellCoord {
    let axis = direction.axis();
    let cross = axis.other();
    let mut line = coord(from, cross);
    if space.is_hidden(cross, line) {
        let Some(visible) = nearest_visible(space, cross, line) else {
            return from;
        };
        line = visible;
    }
    let target = if direction.is_forward() {
        (0..space.extent(axis)).rev().find(|&p| !space.is_hidden(axis, p))
    } else {
        (0..space.extent(axis)).find(|&p| !space.is_hidden(axis, p))
    };
    target.map_or(from, |along| with_coords(axis, along, line))
}

fn coord(cell: CellCoord, axis: Axis) -> usize {
    match axis {
        Axis::Row => cell.row,
        Axis::Column => cell.column,
    }
}

/// Cell with `along` on `axis` and `line` on the other axis.
fn with_coords(axis: Axis, along: usize, line: usize) -> CellCoord {
    match axis {
        Axis::Row => CellCoord::new(along, line),
        Axis::Column => CellCoord::new(line, along),
    }
}

fn step(position: usize, len: usize, forward: bool) -> Option<usize> {
    if forward {
        (position + 1 < len).then_some(position + 1)
    } else {
        position.checked_sub(1)
    }
}

/// Position where a wrapped movement re-enters the axis.
fn border(len: usize, forward: bool) -> usize {
    if forward {
        0
    } else {
        len - 1
    }
}

fn next_visible(space: &dyn TraversalSpace, axis: Axis, from: usize, forward: bool) -> Option<usize> {
    if forward {
        (from + 1..space.extent(axis)).find(|&p| !space.is_hidden(axis, p))
    } else {
        (0..from.min(space.extent(axis))).rev().find(|&p| !space.is_hidden(axis, p))
    }
}

/// Closest visible position to `from` on `axis`, the lower one on a tie.
fn nearest_visible(space: &dyn TraversalSpace, axis: Axis, from: usize) -> Option<usize> {
    let before = next_visible(space, axis, from, false);
    let after = next_visible(space, axis, from, true);
    match (before, after) {
        (Some(b), Some(a)) => Some(if from - b <= a - from { b } else { a }),
        (b, a) => b.or(a),
    }
}

fn first_visible(space: &dyn TraversalSpace, axis: Axis, forward: bool) -> Option<usize> {
    let extent = space.extent(axis);
    if forward {
        (0..extent).find(|&p| !space.is_hidden(axis, p))
    } else {
        (0..extent).rev().find(|&p| !space.is_hidden(axis, p))
    }
}
