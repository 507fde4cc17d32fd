//! Shadow Mapping
//!
//! Everything a light needs to cast a shadow, short of the depth rendering
//! itself:
//!
//! - **Config**: per-shadow-map settings and renderer-wide lighting limits
//! - **Map**: the shadow map component and the viewpoint it renders from
//! - **Coordinator**: sibling lookup and the shadow state of a light
//! - **Slots**: renderer-wide shadow-map slot allocation
//! - **Pass**: the seam the renderer's depth pass plugs into
//!
//! # Usage
//!
//! ```ignore
//! use void_render::shadow::*;
//!
//! // Ask a light to cast shadows; a shadow map appears on its node
//! graph.component_scope::<LightComponent, _>(lamp, |light, graph| {
//!     light.cast_shadow(graph, ShadowMaterial::new("depth"))
//! })??;
//!
//! // The shadow activates once its map has a viewpoint
//! let map = graph.node_mut(lamp).unwrap().get_mut::<ShadowMap>().unwrap();
//! map.set_viewpoint(Viewpoint::orthographic(world, 20.0, 0.1, 100.0));
//!
//! // Per frame, before the main pass
//! registry.prepare_shadow_maps(&mut graph, &mut depth_pass, &mut programs, &mut slots);
//! ```
//!
//! # Hot-Reload Support
//!
//! Settings and slot allocations support serde serialization. Depth textures
//! need to be recreated by the backend after reload.

pub mod config;
pub mod coordinator;
pub mod map;
pub mod pass;
pub mod slots;

pub use config::{LightingConfig, ShadowMapSettings};
pub use coordinator::{ShadowCoordinator, ShadowState};
pub use map::{ShadowMap, ShadowMaterial, Viewpoint};
pub use pass::ShadowPass;
pub use slots::{ShadowSlotTable, SlotStats};
