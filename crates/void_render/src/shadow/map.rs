//! Shadow Map Component
//!
//! The depth-only render target a light draws its shadow into. It lives on
//! the light's node as a sibling component; the light only looks it up.

use std::any::Any;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use void_scene::{Component, ComponentKind, ComponentType};
use void_shader::TextureHandle;

use super::config::ShadowMapSettings;

/// Depth texture handles handed out to shadow maps built without one
static NEXT_DEPTH_TEXTURE: AtomicU32 = AtomicU32::new(1);

/// Maps clip space xy to texture space
const TEXTURE_BIAS: Mat4 = Mat4::from_cols_array(&[
    0.5, 0.0, 0.0, 0.0, //
    0.0, -0.5, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.5, 0.5, 0.0, 1.0,
]);

/// Describes how a shadow map is rendered
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShadowMaterial {
    /// Name of the depth program
    pub program: String,

    /// Shadow map settings
    pub settings: ShadowMapSettings,
}

impl ShadowMaterial {
    /// Material using default settings
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            settings: ShadowMapSettings::default(),
        }
    }

    /// Replace the settings
    pub fn with_settings(mut self, settings: ShadowMapSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Camera a shadow map is rendered from
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    /// World to light view
    pub view: Mat4,

    /// Light view to clip
    pub projection: Mat4,
}

impl Viewpoint {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    /// Orthographic viewpoint for a directional light placed at `world`
    pub fn orthographic(world: Mat4, half_extent: f32, near: f32, far: f32) -> Self {
        Self {
            view: world.inverse(),
            projection: Mat4::orthographic_rh(
                -half_extent,
                half_extent,
                -half_extent,
                half_extent,
                near,
                far,
            ),
        }
    }

    /// Perspective viewpoint for a spot light placed at `world`
    pub fn perspective(world: Mat4, fov_y: f32, near: f32, far: f32) -> Self {
        Self {
            view: world.inverse(),
            projection: Mat4::perspective_rh(fov_y, 1.0, near, far),
        }
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Viewpoint position in world space
    pub fn eye(&self) -> Vec3 {
        self.view.inverse().w_axis.truncate()
    }
}

/// Shadow map component
#[derive(Debug)]
pub struct ShadowMap {
    material: ShadowMaterial,
    depth_texture: TextureHandle,
    enabled: bool,
    viewpoint: Option<Viewpoint>,
}

impl ShadowMap {
    /// Create an enabled shadow map with a fresh depth texture handle
    pub fn new(material: ShadowMaterial) -> Self {
        let texture = TextureHandle::new(NEXT_DEPTH_TEXTURE.fetch_add(1, Ordering::Relaxed));
        Self::with_texture(material, texture)
    }

    /// Create an enabled shadow map over an existing depth texture
    pub fn with_texture(mut material: ShadowMaterial, depth_texture: TextureHandle) -> Self {
        material.settings.validate();
        Self {
            material,
            depth_texture,
            enabled: true,
            viewpoint: None,
        }
    }

    pub fn material(&self) -> &ShadowMaterial {
        &self.material
    }

    pub fn settings(&self) -> &ShadowMapSettings {
        &self.material.settings
    }

    /// Depth texture the pass renders into
    pub fn depth_texture(&self) -> TextureHandle {
        self.depth_texture
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Camera the map is rendered from, if configured
    pub fn viewpoint(&self) -> Option<&Viewpoint> {
        self.viewpoint.as_ref()
    }

    pub fn set_viewpoint(&mut self, viewpoint: Viewpoint) {
        self.viewpoint = Some(viewpoint);
    }

    pub fn clear_viewpoint(&mut self) -> Option<Viewpoint> {
        self.viewpoint.take()
    }

    /// World to shadow-texture transform, once a viewpoint is configured
    pub fn shadow_matrix(&self) -> Option<Mat4> {
        self.viewpoint.map(|vp| TEXTURE_BIAS * vp.view_projection())
    }
}

impl Component for ShadowMap {
    fn component_type(&self) -> ComponentType {
        ComponentType::SHADOW_MAP
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentKind for ShadowMap {
    const TYPE: ComponentType = ComponentType::SHADOW_MAP;
}
