//! Grid configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::selection::TraversalStrategy;

/// Settings for building a [`Grid`](crate::Grid).
///
/// ```json
/// { "rowCount": 100, "columnCount": 20, "traversal": { "scope": "table", "cycle": true, "stepCount": 1 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub row_count: usize,
    pub column_count: usize,
    /// Default strategy of the move-selection handler.
    pub traversal: TraversalStrategy,
    /// Emit a refresh event for commands that changed nothing.
    pub refresh_on_noop: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_count: 0,
            column_count: 0,
            traversal: TraversalStrategy::AXIS,
            refresh_on_noop: true,
        }
    }
}

impl GridConfig {
    pub fn new(row_count: usize, column_count: usize) -> Self {
        Self {
            row_count,
            column_count,
            ..Self::default()
        }
    }

    /// Parse a configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
