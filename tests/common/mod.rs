//! Common test utilities and assertion helpers.
//!
//! Builders for axis stacks and grids with an attached event log.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]

use gridlayer::{axis_stack, AxisStack, EventLog, Grid, GridConfig, GridEvent, LayerEvent};

/// Fresh stack over `len` indexes.
#[must_use]
pub fn stack(len: usize) -> AxisStack {
    axis_stack(len)
}

/// Grid whose events are recorded in the returned log.
#[must_use]
pub fn grid_with_log(rows: usize, columns: usize) -> (Grid, EventLog) {
    grid_with_config(&GridConfig::new(rows, columns))
}

#[must_use]
pub fn grid_with_config(config: &GridConfig) -> (Grid, EventLog) {
    let log = EventLog::new();
    let mut grid = Grid::new(config);
    grid.add_sink(log.clone());
    (grid, log)
}

/// Hide event with identical positions and indexes.
#[must_use]
pub fn hidden(positions: &[usize], indexes: &[usize]) -> LayerEvent {
    LayerEvent::HidePositions {
        positions: positions.to_vec(),
        indexes: indexes.to_vec(),
    }
}

#[must_use]
pub fn shown(positions: &[usize], indexes: &[usize]) -> LayerEvent {
    LayerEvent::ShowPositions {
        positions: positions.to_vec(),
        indexes: indexes.to_vec(),
    }
}

/// The single layer event recorded since the last call, panicking otherwise.
pub fn single_layer_event(log: &EventLog) -> LayerEvent {
    let events = log.take();
    assert_eq!(events.len(), 1, "expected exactly one event, got {events:?}");
    match events.into_iter().next() {
        Some(GridEvent::Layer { event, .. }) => event,
        other => panic!("expected a layer event, got {other:?}"),
    }
}
