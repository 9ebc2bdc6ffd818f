use serde::{Deserialize, Serialize};

/// A cell addressed by row and column.
///
/// Whether the numbers are indexes or positions depends on the owner; the
/// grid keeps its selection in index space so it survives hide/show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub column: usize,
}

impl CellCoord {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Selection state: a fixed anchor and the last selected cell.
///
/// Plain moves collapse both onto the same cell; shift moves only the last
/// selected cell so the range grows from the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub anchor: CellCoord,
    pub last_selected: CellCoord,
}

impl Selection {
    /// Create a single-cell selection
    pub fn single(cell: CellCoord) -> Self {
        Self {
            anchor: cell,
            last_selected: cell,
        }
    }

    /// Keep the anchor and move the selection end
    pub fn extend_to(&mut self, cell: CellCoord) {
        self.last_selected = cell;
    }

    /// True when anchor and last selected cell coincide
    pub fn is_single_cell(&self) -> bool {
        self.anchor == self.last_selected
    }

    /// Get normalized bounds (min_row, min_col, max_row, max_col)
    pub fn bounds(&self) -> (usize, usize, usize, usize) {
        (
            self.anchor.row.min(self.last_selected.row),
            self.anchor.column.min(self.last_selected.column),
            self.anchor.row.max(self.last_selected.row),
            self.anchor.column.max(self.last_selected.column),
        )
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        let (r0, c0, r1, c1) = self.bounds();
        (r0..=r1).contains(&cell.row) && (c0..=c1).contains(&cell.column)
    }
}
