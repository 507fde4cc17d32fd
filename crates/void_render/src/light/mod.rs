//! Lights
//!
//! - **Params**: typed parameter maps of a light
//! - **Dirty**: which programs hold stale copies of a light's uniforms
//! - **Kind**: light kinds, their required parameters and defaults
//! - **Component**: the light attached to a scene node
//! - **Registry**: scene-level light IDs and the per-frame passes

pub mod component;
pub mod dirty;
pub mod kind;
pub mod params;
pub mod registry;

pub use component::LightComponent;
pub use dirty::DirtyTracker;
pub use kind::LightKind;
pub use params::ParameterStore;
pub use registry::{LightRegistry, LightStats};
