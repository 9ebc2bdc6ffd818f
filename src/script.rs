//! JSON scenario scripts.
//!
//! A script configures a grid, runs a list of steps against it and reports
//! the events every step emitted together with the final state. Groups are
//! referenced by name.
//!
//! ```json
//! {
//!   "config": { "rowCount": 10, "columnCount": 4 },
//!   "steps": [
//!     { "op": "addGroup", "axis": "row", "name": "totals", "indexes": [2, 3, 4, 5] },
//!     { "op": "collapse", "axis": "row", "groups": ["totals"] },
//!     { "op": "selectCell", "row": 0, "column": 0 },
//!     { "op": "moveSelection", "direction": "down" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GridConfig;
use crate::error::{GridLayerError, Result};
use crate::events::{EventLog, GridEvent};
use crate::grid::{Grid, GridCommand};
use crate::group::GroupId;
use crate::layer::LayerCommand;
use crate::selection::{MoveSelectionCommand, TraversalStrategy};
use crate::types::{Axis, MoveDirection, Selection};

/// A parsed scenario.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Script {
    pub config: GridConfig,
    pub steps: Vec<ScriptStep>,
}

/// One scripted action.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScriptStep {
    Hide {
        #[serde(default)]
        axis: Axis,
        positions: Vec<usize>,
    },
    HideIndexes {
        #[serde(default)]
        axis: Axis,
        indexes: Vec<usize>,
    },
    Show {
        #[serde(default)]
        axis: Axis,
        positions: Vec<usize>,
        #[serde(default)]
        include_adjacent: bool,
    },
    ShowIndexes {
        #[serde(default)]
        axis: Axis,
        indexes: Vec<usize>,
    },
    ShowAll {
        #[serde(default)]
        axis: Axis,
    },
    /// Define a group by indexes without emitting an event.
    AddGroup {
        #[serde(default)]
        axis: Axis,
        name: String,
        indexes: Vec<usize>,
        #[serde(default)]
        level: usize,
    },
    /// Create a group from visible positions.
    CreateGroup {
        #[serde(default)]
        axis: Axis,
        name: String,
        positions: Vec<usize>,
        #[serde(default)]
        level: usize,
    },
    Collapse {
        #[serde(default)]
        axis: Axis,
        groups: Vec<String>,
    },
    Expand {
        #[serde(default)]
        axis: Axis,
        groups: Vec<String>,
    },
    UpdateCollapsedState {
        #[serde(default)]
        axis: Axis,
        group: String,
        #[serde(default)]
        to_hide: Vec<usize>,
        #[serde(default)]
        to_show: Vec<usize>,
    },
    RemoveGroup {
        #[serde(default)]
        axis: Axis,
        group: String,
    },
    RenameGroup {
        #[serde(default)]
        axis: Axis,
        group: String,
        name: String,
    },
    SetCollapseable {
        #[serde(default)]
        axis: Axis,
        group: String,
        collapseable: bool,
    },
    AddStaticIndexes {
        #[serde(default)]
        axis: Axis,
        group: String,
        indexes: Vec<usize>,
    },
    AddGroupMembers {
        #[serde(default)]
        axis: Axis,
        group: String,
        positions: Vec<usize>,
    },
    RemoveIndexes {
        #[serde(default)]
        axis: Axis,
        indexes: Vec<usize>,
    },
    MoveSelection {
        direction: MoveDirection,
        #[serde(default)]
        strategy: Option<TraversalStrategy>,
        #[serde(default)]
        step_size: Option<usize>,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        ctrl: bool,
    },
    SelectCell {
        row: usize,
        column: usize,
    },
    ClearSelection,
}

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub events: Vec<GridEvent>,
}

/// Snapshot of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupState {
    pub name: String,
    pub level: usize,
    pub members: Vec<usize>,
    pub collapsed: bool,
    pub hidden: Vec<usize>,
}

/// Snapshot of one axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisState {
    pub visible_indexes: Vec<usize>,
    pub hidden_indexes: Vec<usize>,
    pub groups: Vec<GroupState>,
}

impl AxisState {
    fn capture(grid: &Grid, axis: Axis) -> Self {
        let stack = grid.stack(axis);
        let mut groups: Vec<GroupState> = stack
            .group_model()
            .groups()
            .map(|(id, group)| GroupState {
                name: group.name().to_string(),
                level: group.level(),
                members: group.members().to_vec(),
                collapsed: group.is_collapsed(),
                hidden: stack
                    .hidden_indexes_of(id)
                    .map(|set| set.iter().copied().collect())
                    .unwrap_or_default(),
            })
            .collect();
        groups.sort_by(|a, b| {
            (a.level, a.members.first(), &a.name).cmp(&(b.level, b.members.first(), &b.name))
        });

        Self {
            visible_indexes: grid.visible_indexes(axis),
            hidden_indexes: grid.hidden_indexes(axis),
            groups,
        }
    }
}

/// Everything a script run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptReport {
    pub steps: Vec<StepReport>,
    pub rows: AxisState,
    pub columns: AxisState,
    /// Final selection in index space.
    pub selection: Option<Selection>,
}

impl ScriptReport {
    /// All events in emission order.
    pub fn events(&self) -> impl Iterator<Item = &GridEvent> {
        self.steps.iter().flat_map(|step| step.events.iter())
    }

    /// Number of steps that failed.
    pub fn error_count(&self) -> usize {
        self.steps.iter().filter(|step| step.error.is_some()).count()
    }
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run every step on a fresh grid. A failing step is recorded and the
    /// run continues.
    pub fn run(&self) -> ScriptReport {
        let mut grid = Grid::new(&self.config);
        let log = EventLog::new();
        grid.add_sink(log.clone());

        let mut steps = Vec::with_capacity(self.steps.len());
        for (number, step) in self.steps.iter().enumerate() {
            let error = apply_step(&mut grid, step).err().map(|e| {
                debug!(step = number, error = %e, "script step failed");
                e.to_string()
            });
            steps.push(StepReport {
                step: number,
                error,
                events: log.take(),
            });
        }

        let report = ScriptReport {
            steps,
            rows: AxisState::capture(&grid, Axis::Row),
            columns: AxisState::capture(&grid, Axis::Column),
            selection: grid.selection(),
        };
        info!(steps = report.steps.len(), errors = report.error_count(), "script finished");
        report
    }
}

/// Parse and run a script in one go.
pub fn run_script(json: &str) -> Result<ScriptReport> {
    Ok(Script::from_json(json)?.run())
}

fn apply_step(grid: &mut Grid, step: &ScriptStep) -> Result<()> {
    let command = match step {
        ScriptStep::AddGroup {
            axis,
            name,
            indexes,
            level,
        } => {
            grid.create_group(*axis, name, indexes, *level)?;
            return Ok(());
        }
        ScriptStep::Hide { axis, positions } => GridCommand::layer(
            *axis,
            LayerCommand::Hide {
                positions: positions.clone(),
            },
        ),
        ScriptStep::HideIndexes { axis, indexes } => GridCommand::layer(
            *axis,
            LayerCommand::HideIndexes {
                indexes: indexes.clone(),
            },
        ),
        ScriptStep::Show {
            axis,
            positions,
            include_adjacent,
        } => GridCommand::layer(
            *axis,
            LayerCommand::Show {
                positions: positions.clone(),
                include_adjacent: *include_adjacent,
            },
        ),
        ScriptStep::ShowIndexes { axis, indexes } => GridCommand::layer(
            *axis,
            LayerCommand::ShowIndexes {
                indexes: indexes.clone(),
            },
        ),
        ScriptStep::ShowAll { axis } => GridCommand::layer(*axis, LayerCommand::ShowAll),
        ScriptStep::CreateGroup {
            axis,
            name,
            positions,
            level,
        } => GridCommand::layer(
            *axis,
            LayerCommand::CreateGroup {
                name: name.clone(),
                positions: positions.clone(),
                level: *level,
            },
        ),
        ScriptStep::Collapse { axis, groups } => GridCommand::layer(
            *axis,
            LayerCommand::Collapse {
                groups: resolve_all(grid, *axis, groups)?,
            },
        ),
        ScriptStep::Expand { axis, groups } => GridCommand::layer(
            *axis,
            LayerCommand::Expand {
                groups: resolve_all(grid, *axis, groups)?,
            },
        ),
        ScriptStep::UpdateCollapsedState {
            axis,
            group,
            to_hide,
            to_show,
        } => GridCommand::layer(
            *axis,
            LayerCommand::UpdateCollapsedState {
                group: resolve(grid, *axis, group)?,
                to_hide: to_hide.clone(),
                to_show: to_show.clone(),
            },
        ),
        ScriptStep::RemoveGroup { axis, group } => GridCommand::layer(
            *axis,
            LayerCommand::RemoveGroup {
                group: resolve(grid, *axis, group)?,
            },
        ),
        ScriptStep::RenameGroup { axis, group, name } => GridCommand::layer(
            *axis,
            LayerCommand::RenameGroup {
                group: resolve(grid, *axis, group)?,
                name: name.clone(),
            },
        ),
        ScriptStep::SetCollapseable {
            axis,
            group,
            collapseable,
        } => GridCommand::layer(
            *axis,
            LayerCommand::SetCollapseable {
                group: resolve(grid, *axis, group)?,
                collapseable: *collapseable,
            },
        ),
        ScriptStep::AddStaticIndexes { axis, group, indexes } => GridCommand::layer(
            *axis,
            LayerCommand::AddStaticIndexes {
                group: resolve(grid, *axis, group)?,
                indexes: indexes.clone(),
            },
        ),
        ScriptStep::AddGroupMembers {
            axis,
            group,
            positions,
        } => GridCommand::layer(
            *axis,
            LayerCommand::AddGroupMembers {
                group: resolve(grid, *axis, group)?,
                positions: positions.clone(),
            },
        ),
        ScriptStep::RemoveIndexes { axis, indexes } => GridCommand::layer(
            *axis,
            LayerCommand::RemoveIndexes {
                indexes: indexes.clone(),
            },
        ),
        ScriptStep::MoveSelection {
            direction,
            strategy,
            step_size,
            shift,
            ctrl,
        } => GridCommand::MoveSelection(MoveSelectionCommand {
            direction: *direction,
            strategy: *strategy,
            step_size: *step_size,
            shift: *shift,
            ctrl: *ctrl,
        }),
        ScriptStep::SelectCell { row, column } => GridCommand::SelectCell {
            row: *row,
            column: *column,
        },
        ScriptStep::ClearSelection => GridCommand::ClearSelection,
    };
    grid.do_command(&command)
}

fn resolve(grid: &Grid, axis: Axis, name: &str) -> Result<GroupId> {
    grid.find_group(axis, name)
        .ok_or_else(|| GridLayerError::Script(format!("unknown group '{name}'")))
}

fn resolve_all(grid: &Grid, axis: Axis, names: &[String]) -> Result<Vec<GroupId>> {
    names.iter().map(|name| resolve(grid, axis, name)).collect()
}
