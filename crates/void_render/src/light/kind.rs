//! Light kinds and the parameters each one requires

use std::f32::consts::{FRAC_PI_4, FRAC_PI_6};

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use void_shader::UniformKind;

use super::params::ParameterStore;

pub const AMBIENT_INTENSITY: &str = "ambient_intensity";
pub const DIFFUSE_INTENSITY: &str = "diffuse_intensity";
pub const SPECULAR_INTENSITY: &str = "specular_intensity";
pub const WORLD_POSITION: &str = "world_position";
pub const WORLD_DIRECTION: &str = "world_direction";
pub const ATTENUATION_CONSTANT: &str = "attenuation_constant";
pub const ATTENUATION_LINEAR: &str = "attenuation_linear";
pub const ATTENUATION_QUADRATIC: &str = "attenuation_quadratic";
/// Half angle in radians
pub const INNER_CONE_ANGLE: &str = "inner_cone_angle";
/// Half angle in radians
pub const OUTER_CONE_ANGLE: &str = "outer_cone_angle";
/// World to shadow-texture transform, set while a shadow is active
pub const SHADOW_MATRIX: &str = "shadow_matrix";

const COMMON: &[(UniformKind, &str)] = &[
    (UniformKind::Vec4, AMBIENT_INTENSITY),
    (UniformKind::Vec4, DIFFUSE_INTENSITY),
    (UniformKind::Vec4, SPECULAR_INTENSITY),
];

const DIRECTIONAL: &[(UniformKind, &str)] = &[(UniformKind::Vec3, WORLD_DIRECTION)];

const POINT: &[(UniformKind, &str)] = &[
    (UniformKind::Vec3, WORLD_POSITION),
    (UniformKind::Float, ATTENUATION_CONSTANT),
    (UniformKind::Float, ATTENUATION_LINEAR),
    (UniformKind::Float, ATTENUATION_QUADRATIC),
];

const SPOT: &[(UniformKind, &str)] = &[
    (UniformKind::Vec3, WORLD_DIRECTION),
    (UniformKind::Float, INNER_CONE_ANGLE),
    (UniformKind::Float, OUTER_CONE_ANGLE),
];

/// What sort of light a component is
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightKind {
    Directional,
    Point,
    Spot,
    /// User-defined light; only the common parameters are required
    Custom(String),
}

impl LightKind {
    /// Prefix of light IDs assigned to this kind
    pub fn prefix(&self) -> &str {
        match self {
            Self::Directional => "directional",
            Self::Point => "point",
            Self::Spot => "spot",
            Self::Custom(name) => name,
        }
    }

    /// Parameters a light of this kind must carry
    pub fn required(&self) -> impl Iterator<Item = (UniformKind, &'static str)> {
        let specific: &'static [&'static [(UniformKind, &'static str)]] = match self {
            Self::Directional => &[DIRECTIONAL],
            Self::Point => &[POINT],
            Self::Spot => &[POINT, SPOT],
            Self::Custom(_) => &[],
        };
        COMMON
            .iter()
            .chain(specific.iter().flat_map(|s| s.iter()))
            .copied()
    }

    /// Whether the light is positioned in the world
    pub fn uses_position(&self) -> bool {
        !matches!(self, Self::Directional)
    }

    /// Whether the light points somewhere
    pub fn uses_direction(&self) -> bool {
        !matches!(self, Self::Point)
    }

    /// Seed the defaults for this kind
    pub(crate) fn seed(&self, params: &mut ParameterStore) {
        params.set_vec4(AMBIENT_INTENSITY, Vec4::new(0.0, 0.0, 0.0, 1.0));
        params.set_vec4(DIFFUSE_INTENSITY, Vec4::ONE);
        params.set_vec4(SPECULAR_INTENSITY, Vec4::ONE);

        if matches!(self, Self::Point | Self::Spot) {
            params.set_vec3(WORLD_POSITION, Vec3::ZERO);
            params.set_float(ATTENUATION_CONSTANT, 1.0);
            params.set_float(ATTENUATION_LINEAR, 0.0);
            params.set_float(ATTENUATION_QUADRATIC, 0.0);
        }
        if matches!(self, Self::Directional | Self::Spot) {
            params.set_vec3(WORLD_DIRECTION, Vec3::NEG_Z);
        }
        if matches!(self, Self::Spot) {
            params.set_float(INNER_CONE_ANGLE, FRAC_PI_6);
            params.set_float(OUTER_CONE_ANGLE, FRAC_PI_4);
        }
    }
}
