use serde::Serialize;

/// Structural notification raised by a layer.
///
/// Positions are always in the coordinates of the layer that returns the
/// event; indexes are stable across the whole stack. Both lists are ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayerEvent {
    /// Indexes became hidden. Positions are the ones they had before the hide.
    HidePositions {
        positions: Vec<usize>,
        indexes: Vec<usize>,
    },
    /// Indexes became visible. Positions are the ones they have after the show.
    ShowPositions {
        positions: Vec<usize>,
        indexes: Vec<usize>,
    },
    /// Indexes were deleted from the index space. Positions are the visible
    /// positions they occupied before the removal.
    IndexesRemoved {
        positions: Vec<usize>,
        indexes: Vec<usize>,
    },
    /// Nothing moved; observers may repaint.
    VisualRefresh,
}

impl LayerEvent {
    /// True for events that shift positions.
    pub fn is_structural(&self) -> bool {
        !matches!(self, LayerEvent::VisualRefresh)
    }

    /// Positions carried by the event (empty for a refresh).
    pub fn positions(&self) -> &[usize] {
        match self {
            LayerEvent::HidePositions { positions, .. }
            | LayerEvent::ShowPositions { positions, .. }
            | LayerEvent::IndexesRemoved { positions, .. } => positions,
            LayerEvent::VisualRefresh => &[],
        }
    }

    /// Indexes carried by the event (empty for a refresh).
    pub fn indexes(&self) -> &[usize] {
        match self {
            LayerEvent::HidePositions { indexes, .. }
            | LayerEvent::ShowPositions { indexes, .. }
            | LayerEvent::IndexesRemoved { indexes, .. } => indexes,
            LayerEvent::VisualRefresh => &[],
        }
    }
}
