//! Scene graph errors

use thiserror::Error;

use crate::component::ComponentType;
use crate::graph::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("Node {node:?} has no {component:?}")]
    ComponentNotFound { node: NodeId, component: ComponentType },

    #[error("Node {node:?} already has a {component:?}")]
    ComponentTypeOccupied { node: NodeId, component: ComponentType },

    #[error("Component {component:?} on node {node:?} is not of the requested Rust type")]
    ComponentTypeMismatch { node: NodeId, component: ComponentType },

    #[error("Component {component:?} on node {node:?} is already borrowed")]
    ComponentBusy { node: NodeId, component: ComponentType },
}

/// Result type for scene operations
pub type Result<T> = core::result::Result<T, SceneError>;
