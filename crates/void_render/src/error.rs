//! Lighting errors

use thiserror::Error;
use void_scene::{NodeId, SceneError};
use void_shader::UniformKind;

/// Errors from lights, the light registry and lighting configuration
#[derive(Debug, Error)]
pub enum LightError {
    /// A mandatory parameter was read before it was ever set
    #[error("Light parameter '{name}' ({kind:?}) not found")]
    ParameterNotFound { kind: UniformKind, name: String },

    #[error("Light already has ID '{current}', cannot assign '{requested}'")]
    LightIdAssigned { current: String, requested: String },

    #[error("Node {0:?} carries no light")]
    NotALight(NodeId),

    #[error("Light on node {0:?} is not registered")]
    NotRegistered(NodeId),

    #[error("Light on node {0:?} is already registered")]
    AlreadyRegistered(NodeId),

    #[error("Too many lights (limit {0})")]
    TooManyLights(usize),

    #[error("Light is not attached to a node")]
    Detached,

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Invalid lighting config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for lighting operations
pub type Result<T> = core::result::Result<T, LightError>;
