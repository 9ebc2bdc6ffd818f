use super::Layer;
use crate::error::{GridLayerError, Result};
use crate::group::GroupId;

/// Commands understood by an axis stack.
///
/// Fields named `positions` are in the coordinates of the layer currently
/// handling the command and get converted on every hop down the stack.
/// Fields named `indexes` are stack-wide and travel unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerCommand {
    /// Hide the indexes shown at `positions`.
    Hide { positions: Vec<usize> },
    /// Hide indexes directly.
    HideIndexes { indexes: Vec<usize> },
    /// Reveal the hidden run directly after each position, and with
    /// `include_adjacent` the run directly before it too.
    Show {
        positions: Vec<usize>,
        include_adjacent: bool,
    },
    /// Show indexes directly.
    ShowIndexes { indexes: Vec<usize> },
    /// Show everything hidden by the hide/show layer.
    ShowAll,
    /// Collapse the given groups.
    Collapse { groups: Vec<GroupId> },
    /// Expand the given groups.
    Expand { groups: Vec<GroupId> },
    /// Adjust the hidden set of a group that stays collapsed.
    UpdateCollapsedState {
        group: GroupId,
        to_hide: Vec<usize>,
        to_show: Vec<usize>,
    },
    /// Create a group from the indexes at `positions`.
    CreateGroup {
        name: String,
        positions: Vec<usize>,
        level: usize,
    },
    /// Expand and then remove a group.
    RemoveGroup { group: GroupId },
    RenameGroup { group: GroupId, name: String },
    SetCollapseable { group: GroupId, collapseable: bool },
    /// Pin members so collapse never hides them.
    AddStaticIndexes { group: GroupId, indexes: Vec<usize> },
    /// Add the indexes at `positions` to an existing group.
    AddGroupMembers { group: GroupId, positions: Vec<usize> },
    /// Delete indexes from the underlying index space.
    RemoveIndexes { indexes: Vec<usize> },
}

impl LayerCommand {
    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            LayerCommand::Hide { .. } => "hide",
            LayerCommand::HideIndexes { .. } => "hide-indexes",
            LayerCommand::Show { .. } => "show",
            LayerCommand::ShowIndexes { .. } => "show-indexes",
            LayerCommand::ShowAll => "show-all",
            LayerCommand::Collapse { .. } => "collapse",
            LayerCommand::Expand { .. } => "expand",
            LayerCommand::UpdateCollapsedState { .. } => "update-collapsed-state",
            LayerCommand::CreateGroup { .. } => "create-group",
            LayerCommand::RemoveGroup { .. } => "remove-group",
            LayerCommand::RenameGroup { .. } => "rename-group",
            LayerCommand::SetCollapseable { .. } => "set-collapseable",
            LayerCommand::AddStaticIndexes { .. } => "add-static-indexes",
            LayerCommand::AddGroupMembers { .. } => "add-group-members",
            LayerCommand::RemoveIndexes { .. } => "remove-indexes",
        }
    }

    /// Re-express the command in the coordinates of the layer beneath `layer`.
    ///
    /// Fails with [`GridLayerError::PositionOutOfRange`] if a position does not
    /// exist in `layer`.
    pub fn convert_to_underlying(&self, layer: &dyn Layer) -> Result<Self> {
        let converted = match self {
            LayerCommand::Hide { positions } => LayerCommand::Hide {
                positions: convert_positions(layer, positions)?,
            },
            LayerCommand::Show {
                positions,
                include_adjacent,
            } => LayerCommand::Show {
                positions: convert_positions(layer, positions)?,
                include_adjacent: *include_adjacent,
            },
            LayerCommand::CreateGroup {
                name,
                positions,
                level,
            } => LayerCommand::CreateGroup {
                name: name.clone(),
                positions: convert_positions(layer, positions)?,
                level: *level,
            },
            LayerCommand::AddGroupMembers { group, positions } => LayerCommand::AddGroupMembers {
                group: *group,
                positions: convert_positions(layer, positions)?,
            },
            other => other.clone(),
        };
        Ok(converted)
    }
}

fn convert_positions(layer: &dyn Layer, positions: &[usize]) -> Result<Vec<usize>> {
    positions
        .iter()
        .map(|&position| {
            layer
                .underlying_position(position)
                .ok_or(GridLayerError::PositionOutOfRange {
                    position,
                    count: layer.position_count(),
                })
        })
        .collect()
}
