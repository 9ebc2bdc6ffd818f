use serde::{Deserialize, Serialize};

/// The two coordinate axes of a grid. Every layer stack works along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    #[default]
    Row,
    Column,
}

impl Axis {
    /// The perpendicular axis.
    pub fn other(self) -> Self {
        match self {
            Axis::Row => Axis::Column,
            Axis::Column => Axis::Row,
        }
    }
}

/// Direction of a selection movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    /// Axis whose positions change when moving in this direction.
    ///
    /// Up/down walks over rows, left/right over columns.
    pub fn axis(self) -> Axis {
        match self {
            MoveDirection::Up | MoveDirection::Down => Axis::Row,
            MoveDirection::Left | MoveDirection::Right => Axis::Column,
        }
    }

    /// True when moving towards higher positions.
    pub fn is_forward(self) -> bool {
        matches!(self, MoveDirection::Down | MoveDirection::Right)
    }
}
