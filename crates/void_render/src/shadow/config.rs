//! Shadow and Lighting Configuration
//!
//! Per-shadow-map settings and the renderer-wide lighting limits, with serde
//! support for hot-reload.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for one light's shadow map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowMapSettings {
    /// Depth texture resolution (power of 2)
    pub resolution: u32,

    /// Depth bias to prevent shadow acne
    pub depth_bias: f32,

    /// Slope-scaled depth bias
    pub slope_bias: f32,

    /// Normal-based offset to prevent peter-panning
    pub normal_bias: f32,

    /// Near plane of the shadow viewpoint
    pub near_plane: f32,

    /// Far plane of the shadow viewpoint
    pub far_plane: f32,

    /// Shadow strength (0 = no shadow, 1 = full shadow)
    pub strength: f32,
}

impl Default for ShadowMapSettings {
    fn default() -> Self {
        Self {
            resolution: 2048,
            depth_bias: 0.005,
            slope_bias: 2.0,
            normal_bias: 0.02,
            near_plane: 0.1,
            far_plane: 100.0,
            strength: 1.0,
        }
    }
}

impl ShadowMapSettings {
    /// Settings for a directional light
    pub fn directional() -> Self {
        Self {
            depth_bias: 0.002,
            slope_bias: 1.5,
            normal_bias: 0.01,
            far_plane: 200.0,
            ..Default::default()
        }
    }

    /// Settings for a spot light
    pub fn spot() -> Self {
        Self {
            resolution: 1024,
            ..Default::default()
        }
    }

    /// Settings for a point light
    pub fn point() -> Self {
        Self {
            resolution: 1024,
            depth_bias: 0.01,
            slope_bias: 3.0,
            normal_bias: 0.03,
            near_plane: 0.05,
            far_plane: 50.0,
            ..Default::default()
        }
    }

    /// Set shadow strength
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength.clamp(0.0, 1.0);
        self
    }

    /// Set resolution
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Clamp values to valid ranges
    pub fn validate(&mut self) {
        self.resolution = self.resolution.clamp(256, 8192).next_power_of_two();
        self.depth_bias = self.depth_bias.max(0.0);
        self.slope_bias = self.slope_bias.max(0.0);
        self.normal_bias = self.normal_bias.max(0.0);
        self.near_plane = self.near_plane.max(0.001);
        self.far_plane = self.far_plane.max(self.near_plane + 0.001);
        self.strength = self.strength.clamp(0.0, 1.0);
    }
}

/// Renderer-wide lighting limits
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Maximum registered lights
    pub max_lights: usize,

    /// Shadow-map slots available per frame
    pub shadow_slots: u32,

    /// Settings used when a light casts a shadow without its own
    pub default_shadow: ShadowMapSettings,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            max_lights: 16,
            shadow_slots: 8,
            default_shadow: ShadowMapSettings::default(),
        }
    }
}

impl LightingConfig {
    /// Configuration for constrained hardware
    pub fn low_quality() -> Self {
        Self {
            max_lights: 8,
            shadow_slots: 2,
            default_shadow: ShadowMapSettings::default().with_resolution(1024),
        }
    }

    /// Configuration for high-end hardware
    pub fn high_quality() -> Self {
        Self {
            max_lights: 64,
            shadow_slots: 16,
            default_shadow: ShadowMapSettings::default().with_resolution(4096),
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.validate();
        Ok(config)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp values to valid ranges
    pub fn validate(&mut self) {
        self.max_lights = self.max_lights.clamp(1, 1024);
        self.shadow_slots = self.shadow_slots.clamp(1, 64);
        self.default_shadow.validate();
    }
}
