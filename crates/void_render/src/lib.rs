//! # void_render - Scene Lighting
//!
//! Lights as scene-graph components, and the per-frame protocol that keeps
//! rendering programs in sync with them:
//! - Typed light parameters with per-program dirty tracking
//! - Shadow maps as sibling components, activated by enablement and viewpoint
//! - A scene-level registry that assigns light IDs and drives the
//!   shadow and uniform passes
//!
//! ## Architecture
//!
//! ```text
//!  scene setup / animation ──► LightComponent::set_* ──► ParameterStore
//!                                      │                       │
//!                                      ▼                       ▼
//!                                DirtyTracker ◄──── refresh_uniforms ──► ProgramManager
//!                                                              ▲
//!  ShadowMap (sibling) ◄── ShadowCoordinator ── prepare_shadow_map ──► ShadowPass
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use void_render::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let mut programs = ProgramRegistry::new();
//! let lit = programs.register_wgsl("lit", LIT_WGSL)?;
//!
//! let mut lights = LightRegistry::default();
//! let mut slots = lights.create_slot_table();
//!
//! let sun = graph.create_node("sun");
//! graph.attach_component(sun, Box::new(LightComponent::directional()))?;
//! lights.add_light(&mut graph, sun)?;
//!
//! // Per frame
//! lights.sync_transforms(&mut graph);
//! lights.prepare_shadow_maps(&mut graph, &mut depth_pass, &mut programs, &mut slots);
//! lights.refresh_uniforms(&mut graph, &mut programs, lit, 4);
//! ```

pub mod error;
pub mod light;
pub mod shadow;

pub use error::{LightError, Result};

// Lights
pub use light::{
    DirtyTracker, LightComponent, LightKind, LightRegistry, LightStats, ParameterStore,
};

// Shadow Mapping
pub use shadow::{
    LightingConfig, ShadowCoordinator, ShadowMap, ShadowMapSettings, ShadowMaterial, ShadowPass,
    ShadowSlotTable, ShadowState, SlotStats, Viewpoint,
};

pub mod prelude {
    pub use crate::error::{LightError, Result};
    pub use crate::light::{LightComponent, LightKind, LightRegistry, ParameterStore};
    pub use crate::shadow::{
        LightingConfig, ShadowMap, ShadowMapSettings, ShadowMaterial, ShadowPass,
        ShadowSlotTable, ShadowState, Viewpoint,
    };
    pub use void_scene::prelude::*;
    pub use void_shader::prelude::*;
}
