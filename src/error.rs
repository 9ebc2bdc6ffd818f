//! Structured error types for gridlayer.
//!
//! Lookup misses are never errors: position/index queries return `Option`.
//! Everything here is a validation failure that leaves the layer stack untouched.

/// All errors that can occur while validating or applying a command.
#[derive(Debug, thiserror::Error)]
pub enum GridLayerError {
    /// An index is already claimed by another group at the same level.
    #[error("index {index} already belongs to group '{group}'")]
    GroupOverlap { index: usize, group: String },

    /// A group must have at least one member.
    #[error("a group needs at least one member")]
    EmptyGroup,

    /// The group handle does not resolve (removed or never created).
    #[error("unknown group")]
    UnknownGroup,

    /// The group rejects expand/collapse.
    #[error("group '{0}' is not collapseable")]
    NotCollapseable(String),

    /// The index is not a member of the group.
    #[error("index {index} is not a member of group '{group}'")]
    NotAMember { index: usize, group: String },

    /// The position does not exist in the addressed layer.
    #[error("position {position} out of range (layer has {count} positions)")]
    PositionOutOfRange { position: usize, count: usize },

    /// No layer in the stack handled the command.
    #[error("command not handled: {0}")]
    Unhandled(&'static str),

    /// JSON (de)serialization failure for configs and scripts.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed scenario script.
    #[error("script: {0}")]
    Script(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridLayerError>;

#[cfg(target_arch = "wasm32")]
impl From<GridLayerError> for wasm_bindgen::JsValue {
    fn from(e: GridLayerError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
