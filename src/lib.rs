//! gridlayer - position/index virtualization for grid widgets
//!
//! Maps visible positions to stable indexes along the rows and columns of a
//! grid through a stack of layers:
//! - Hide/show of individual rows and columns
//! - Named, nestable groups that collapse and expand
//! - Static group members that stay visible when collapsed
//! - Selection traversal that skips hidden cells
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { run_script_to_js } from 'gridlayer';
//! await init();
//! const report = run_script_to_js(JSON.stringify(script));
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod group;
pub mod layer;
pub mod script;
pub mod selection;
pub mod types;

use wasm_bindgen::prelude::*;

pub use config::GridConfig;
pub use error::GridLayerError;
pub use events::{EventLog, EventSink, GridEvent};
pub use grid::{axis_stack, AxisStack, Grid, GridCommand};
pub use group::{Group, GroupExpandCollapseLayer, GroupId, GroupModel};
pub use layer::{HideShowLayer, IndexPositionLayer, Layer, LayerCommand, LayerEvent, PositionLookup};
pub use script::{run_script, Script, ScriptReport};
pub use selection::{MoveSelectionCommand, MoveSelectionHandler, TraversalScope, TraversalStrategy};

pub use types::*;

/// Run a JSON scenario script and return the report as a JSON string
///
/// # Errors
/// Returns an error if the script is not valid JSON or names an unknown op.
#[wasm_bindgen]
pub fn run_script_json(script: &str) -> Result<String, JsValue> {
    let report = run_script(script).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&report)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Run a JSON scenario script and return the report as a `JsValue`
///
/// Avoids a second JSON round trip when the result is consumed directly in
/// JavaScript.
///
/// # Errors
/// Returns an error if the script is not valid JSON or names an unknown op.
#[wasm_bindgen]
pub fn run_script_to_js(script: &str) -> Result<JsValue, JsValue> {
    let report = run_script(script).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&report)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
