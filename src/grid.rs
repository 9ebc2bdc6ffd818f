//! A two-axis grid: one layer stack per axis, a selection and event sinks.

use std::fmt;

use tracing::{debug, warn};

use crate::config::GridConfig;
use crate::error::{GridLayerError, Result};
use crate::events::{EventSink, GridEvent};
use crate::group::{GroupExpandCollapseLayer, GroupId, GroupModel};
use crate::layer::{shift_index, HideShowLayer, IndexPositionLayer, Layer, LayerCommand, LayerEvent, PositionLookup};
use crate::selection::{MoveSelectionCommand, MoveSelectionHandler, TraversalSpace};
use crate::types::{Axis, CellCoord, Selection};

/// Layer stack of one axis, top to bottom.
pub type AxisStack = GroupExpandCollapseLayer<HideShowLayer<IndexPositionLayer>>;

/// Build an axis stack over `len` indexes.
pub fn axis_stack(len: usize) -> AxisStack {
    GroupExpandCollapseLayer::new(HideShowLayer::new(IndexPositionLayer::new(len)))
}

/// Commands accepted by [`Grid::do_command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCommand {
    /// Send a layer command down the stack of `axis`.
    Layer { axis: Axis, command: LayerCommand },
    MoveSelection(MoveSelectionCommand),
    /// Select a single cell given in visible positions.
    SelectCell { row: usize, column: usize },
    ClearSelection,
}

impl GridCommand {
    pub fn layer(axis: Axis, command: LayerCommand) -> Self {
        GridCommand::Layer { axis, command }
    }

    pub fn rows(command: LayerCommand) -> Self {
        Self::layer(Axis::Row, command)
    }

    pub fn columns(command: LayerCommand) -> Self {
        Self::layer(Axis::Column, command)
    }
}

/// Rows and columns virtualized by their layer stacks.
///
/// Every call to [`Grid::do_command`] delivers at most one [`GridEvent`] to
/// the registered sinks, after all layers finished updating.
pub struct Grid {
    rows: AxisStack,
    columns: AxisStack,
    /// Stored as indexes so hide/show does not move it.
    selection: Option<Selection>,
    move_handler: MoveSelectionHandler,
    refresh_on_noop: bool,
    sinks: Vec<Box<dyn EventSink>>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("selection", &self.selection)
            .field("move_handler", &self.move_handler)
            .field("refresh_on_noop", &self.refresh_on_noop)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Grid {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            rows: axis_stack(config.row_count),
            columns: axis_stack(config.column_count),
            selection: None,
            move_handler: MoveSelectionHandler::new(config.traversal),
            refresh_on_noop: config.refresh_on_noop,
            sinks: Vec::new(),
        }
    }

    /// Grid with default settings.
    pub fn with_size(row_count: usize, column_count: usize) -> Self {
        Self::new(&GridConfig::new(row_count, column_count))
    }

    /// Register a receiver for all subsequent events.
    pub fn add_sink<S: EventSink + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    pub fn stack(&self, axis: Axis) -> &AxisStack {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    fn stack_mut(&mut self, axis: Axis) -> &mut AxisStack {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }

    pub fn group_model(&self, axis: Axis) -> &GroupModel {
        self.stack(axis).group_model()
    }

    /// Look a group up by name.
    pub fn find_group(&self, axis: Axis, name: &str) -> Option<GroupId> {
        self.group_model(axis).find_by_name(name)
    }

    /// Number of indexes along `axis`, hidden ones included.
    pub fn index_count(&self, axis: Axis) -> usize {
        self.stack(axis).underlying().underlying().len()
    }

    /// Number of visible positions along `axis`.
    pub fn position_count(&self, axis: Axis) -> usize {
        self.stack(axis).position_count()
    }

    pub fn index_by_position(&self, axis: Axis, position: usize) -> Option<usize> {
        self.stack(axis).index_by_position(position)
    }

    pub fn position_by_index(&self, axis: Axis, index: usize) -> Option<usize> {
        self.stack(axis).position_by_index(index)
    }

    pub fn visible_indexes(&self, axis: Axis) -> Vec<usize> {
        self.stack(axis).visible_indexes()
    }

    /// Indexes hidden by any layer of the stack, ascending.
    pub fn hidden_indexes(&self, axis: Axis) -> Vec<usize> {
        let stack = self.stack(axis);
        (0..self.index_count(axis))
            .filter(|&index| stack.position_by_index(index).is_none())
            .collect()
    }

    /// Selection in index space.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Selection in visible positions, `None` if a corner is hidden.
    pub fn selection_positions(&self) -> Option<Selection> {
        let selection = self.selection?;
        Some(Selection {
            anchor: self.cell_position(selection.anchor)?,
            last_selected: self.cell_position(selection.last_selected)?,
        })
    }

    fn cell_position(&self, cell: CellCoord) -> Option<CellCoord> {
        Some(CellCoord::new(
            self.rows.position_by_index(cell.row)?,
            self.columns.position_by_index(cell.column)?,
        ))
    }

    /// Create a group from indexes without emitting an event.
    pub fn create_group(&mut self, axis: Axis, name: &str, indexes: &[usize], level: usize) -> Result<GroupId> {
        self.stack_mut(axis).add_group(name, indexes, level)
    }

    /// Execute a command and notify the sinks.
    ///
    /// A rejected command changes nothing; the sinks still get a refresh
    /// (unless disabled in the config) and the error is returned.
    pub fn do_command(&mut self, command: &GridCommand) -> Result<()> {
        match command {
            GridCommand::Layer { axis, command } => self.do_layer_command(*axis, command),
            GridCommand::MoveSelection(move_command) => {
                self.move_selection(move_command);
                Ok(())
            }
            GridCommand::SelectCell { row, column } => self.select_cell(*row, *column),
            GridCommand::ClearSelection => {
                self.set_selection(None);
                Ok(())
            }
        }
    }

    fn do_layer_command(&mut self, axis: Axis, command: &LayerCommand) -> Result<()> {
        match self.stack_mut(axis).do_command(command) {
            Ok(Some(event)) => {
                debug!(?axis, command = command.name(), structural = event.is_structural(), "command handled");
                if let LayerEvent::IndexesRemoved { indexes, .. } = &event {
                    self.adjust_selection(axis, indexes);
                }
                self.emit_layer(axis, event);
                Ok(())
            }
            Ok(None) => {
                warn!(?axis, command = command.name(), "no layer handled command");
                self.emit_layer(axis, LayerEvent::VisualRefresh);
                Err(GridLayerError::Unhandled(command.name()))
            }
            Err(error) => {
                debug!(?axis, command = command.name(), %error, "command rejected");
                self.emit_layer(axis, LayerEvent::VisualRefresh);
                Err(error)
            }
        }
    }

    fn move_selection(&mut self, command: &MoveSelectionCommand) {
        let Some(current) = self.selection.or_else(|| self.first_visible_cell().map(Selection::single)) else {
            self.set_selection(None);
            return;
        };
        let space = IndexSpace {
            rows: &self.rows,
            columns: &self.columns,
        };
        let moved = self.move_handler.move_selection(&space, current, command);
        self.set_selection(Some(moved));
    }

    fn first_visible_cell(&self) -> Option<CellCoord> {
        Some(CellCoord::new(
            self.rows.index_by_position(0)?,
            self.columns.index_by_position(0)?,
        ))
    }

    fn select_cell(&mut self, row: usize, column: usize) -> Result<()> {
        let cell = self
            .rows
            .index_by_position(row)
            .ok_or(GridLayerError::PositionOutOfRange {
                position: row,
                count: self.rows.position_count(),
            })
            .and_then(|row| {
                let column_index =
                    self.columns
                        .index_by_position(column)
                        .ok_or(GridLayerError::PositionOutOfRange {
                            position: column,
                            count: self.columns.position_count(),
                        })?;
                Ok(CellCoord::new(row, column_index))
            });

        match cell {
            Ok(cell) => {
                self.set_selection(Some(Selection::single(cell)));
                Ok(())
            }
            Err(error) => {
                debug!(row, column, %error, "select rejected");
                let current = self.selection;
                self.set_selection(current);
                Err(error)
            }
        }
    }

    /// Follow an index removal; a removed corner lands on its nearest survivor.
    fn adjust_selection(&mut self, axis: Axis, removed: &[usize]) {
        let Some(selection) = self.selection else {
            return;
        };
        let len = self.index_count(axis);
        if len == 0 {
            self.selection = None;
            return;
        }
        let adjust = |cell: CellCoord| -> CellCoord {
            let shift = |index: usize| {
                shift_index(index, removed)
                    .unwrap_or_else(|| index - removed.partition_point(|&r| r < index))
                    .min(len - 1)
            };
            match axis {
                Axis::Row => CellCoord::new(shift(cell.row), cell.column),
                Axis::Column => CellCoord::new(cell.row, shift(cell.column)),
            }
        };
        self.selection = Some(Selection {
            anchor: adjust(selection.anchor),
            last_selected: adjust(selection.last_selected),
        });
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        if selection == self.selection && !self.refresh_on_noop {
            return;
        }
        self.selection = selection;
        self.emit(&GridEvent::SelectionChanged { selection });
    }

    fn emit_layer(&mut self, axis: Axis, event: LayerEvent) {
        if !event.is_structural() && !self.refresh_on_noop {
            return;
        }
        self.emit(&GridEvent::Layer { axis, event });
    }

    fn emit(&mut self, event: &GridEvent) {
        for sink in &mut self.sinks {
            sink.notify(event);
        }
    }
}

/// Index space of both axes; an index is hidden when no layer shows it.
struct IndexSpace<'a> {
    rows: &'a AxisStack,
    columns: &'a AxisStack,
}

impl IndexSpace<'_> {
    fn stack(&self, axis: Axis) -> &AxisStack {
        match axis {
            Axis::Row => self.rows,
            Axis::Column => self.columns,
        }
    }
}

impl TraversalSpace for IndexSpace<'_> {
    fn extent(&self, axis: Axis) -> usize {
        self.stack(axis).underlying().underlying().len()
    }

    fn is_hidden(&self, axis: Axis, position: usize) -> bool {
        self.stack(axis).position_by_index(position).is_none()
    }
}
