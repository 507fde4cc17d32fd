//! # void_scene - Scene Graph
//!
//! Nodes arranged in a hierarchy, each carrying a small set of components
//! keyed by capability:
//! - **Arena**: generational storage shared by nodes and component lists
//! - **Component**: the attachment contract (type tag, enable state, owner hooks)
//! - **SceneGraph**: node creation/removal, transforms, attach/detach and
//!   scoped component borrows
//!
//! ## Example
//!
//! ```ignore
//! use void_scene::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let lamp = graph.create_node("lamp");
//! graph.attach_component(lamp, Box::new(my_light))?;
//!
//! // Borrow the light together with the graph to reach its siblings
//! graph.component_scope::<MyLight, _>(lamp, |light, graph| {
//!     light.inspect_siblings(graph);
//! })?;
//! ```

pub mod arena;
pub mod component;
pub mod error;
pub mod graph;

pub use arena::{Arena, ArenaKey};
pub use component::{Component, ComponentKey, ComponentKind, ComponentType};
pub use error::{Result, SceneError};
pub use graph::{NodeId, SceneGraph, SceneNode};

pub mod prelude {
    pub use crate::component::{Component, ComponentKind, ComponentType};
    pub use crate::error::SceneError;
    pub use crate::graph::{NodeId, SceneGraph, SceneNode};
}
