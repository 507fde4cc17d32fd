//! Light Parameters
//!
//! Named, typed light parameters kept in four independent namespaces:
//! scalars, 3-vectors, 4-vectors and 4x4 matrices. The same name may appear
//! in more than one namespace. Parameters are only ever overwritten, never
//! removed.
//!
//! Scalars and vectors are mandatory once a light type relies on them, so
//! reading one that was never set is an error. Matrices are optional and a
//! missing one reads as `None`.

use std::collections::BTreeMap;

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use void_shader::{UniformKind, UniformValue};

use crate::error::{LightError, Result};

/// Typed parameter maps of one light
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterStore {
    floats: BTreeMap<String, f32>,
    vec3s: BTreeMap<String, Vec3>,
    vec4s: BTreeMap<String, Vec4>,
    mat4s: BTreeMap<String, Mat4>,
}

fn not_found(kind: UniformKind, name: &str) -> LightError {
    LightError::ParameterNotFound {
        kind,
        name: name.to_string(),
    }
}

/// Insert `value`, reporting whether it differs from what was stored
fn overwrite<T: PartialEq>(map: &mut BTreeMap<String, T>, name: &str, value: T) -> bool {
    match map.get_mut(name) {
        Some(current) if *current == value => false,
        Some(current) => {
            *current = value;
            true
        }
        None => {
            map.insert(name.to_string(), value);
            true
        }
    }
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_float(&self, name: &str) -> Result<f32> {
        self.floats
            .get(name)
            .copied()
            .ok_or_else(|| not_found(UniformKind::Float, name))
    }

    pub fn get_vec3(&self, name: &str) -> Result<Vec3> {
        self.vec3s
            .get(name)
            .copied()
            .ok_or_else(|| not_found(UniformKind::Vec3, name))
    }

    pub fn get_vec4(&self, name: &str) -> Result<Vec4> {
        self.vec4s
            .get(name)
            .copied()
            .ok_or_else(|| not_found(UniformKind::Vec4, name))
    }

    /// Matrices are optional; a missing one is not an error
    pub fn get_mat4(&self, name: &str) -> Option<Mat4> {
        self.mat4s.get(name).copied()
    }

    /// Returns true if the value changed
    pub fn set_float(&mut self, name: &str, value: f32) -> bool {
        overwrite(&mut self.floats, name, value)
    }

    /// Returns true if the value changed
    pub fn set_vec3(&mut self, name: &str, value: Vec3) -> bool {
        overwrite(&mut self.vec3s, name, value)
    }

    /// Returns true if the value changed
    pub fn set_vec4(&mut self, name: &str, value: Vec4) -> bool {
        overwrite(&mut self.vec4s, name, value)
    }

    /// Returns true if the value changed
    pub fn set_mat4(&mut self, name: &str, value: Mat4) -> bool {
        overwrite(&mut self.mat4s, name, value)
    }

    /// Check if a parameter of the given kind is set
    pub fn contains(&self, kind: UniformKind, name: &str) -> bool {
        match kind {
            UniformKind::Float => self.floats.contains_key(name),
            UniformKind::Vec3 => self.vec3s.contains_key(name),
            UniformKind::Vec4 => self.vec4s.contains_key(name),
            UniformKind::Mat4 => self.mat4s.contains_key(name),
            UniformKind::Texture => false,
        }
    }

    /// Total number of parameters across all namespaces
    pub fn len(&self) -> usize {
        self.floats.len() + self.vec3s.len() + self.vec4s.len() + self.mat4s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every parameter as an uploadable value, scalars first
    pub fn uniforms(&self) -> impl Iterator<Item = (&str, UniformValue)> + '_ {
        let floats = self
            .floats
            .iter()
            .map(|(k, v)| (k.as_str(), UniformValue::Float(*v)));
        let vec3s = self
            .vec3s
            .iter()
            .map(|(k, v)| (k.as_str(), UniformValue::Vec3(*v)));
        let vec4s = self
            .vec4s
            .iter()
            .map(|(k, v)| (k.as_str(), UniformValue::Vec4(*v)));
        let mat4s = self
            .mat4s
            .iter()
            .map(|(k, v)| (k.as_str(), UniformValue::Mat4(*v)));
        floats.chain(vec3s).chain(vec4s).chain(mat4s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_after_set() {
        let mut store = ParameterStore::new();
        store.set_float("attenuation_linear", 0.25);
        store.set_vec3("world_position", Vec3::new(1.0, 2.0, 3.0));
        store.set_vec4("diffuse_intensity", Vec4::new(1.0, 0.5, 0.25, 1.0));
        store.set_mat4("sm0", Mat4::from_scale(Vec3::splat(2.0)));

        assert_eq!(store.get_float("attenuation_linear").unwrap(), 0.25);
        assert_eq!(store.get_vec3("world_position").unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            store.get_vec4("diffuse_intensity").unwrap(),
            Vec4::new(1.0, 0.5, 0.25, 1.0)
        );
        assert_eq!(store.get_mat4("sm0"), Some(Mat4::from_scale(Vec3::splat(2.0))));

        store.set_float("attenuation_linear", 0.5);
        assert_eq!(store.get_float("attenuation_linear").unwrap(), 0.5);
    }

    #[test]
    fn test_missing_mandatory_parameter_is_error() {
        let store = ParameterStore::new();

        match store.get_vec3("world_position") {
            Err(LightError::ParameterNotFound { kind, name }) => {
                assert_eq!(kind, UniformKind::Vec3);
                assert_eq!(name, "world_position");
            }
            other => panic!("expected ParameterNotFound, got {:?}", other),
        }
        assert!(store.get_float("x").is_err());
        assert!(store.get_vec4("x").is_err());
    }

    #[test]
    fn test_missing_matrix_is_none() {
        let store = ParameterStore::new();
        assert_eq!(store.get_mat4("sm0"), None);
    }

    #[test]
    fn test_namespaces_are_independent() {
        let mut store = ParameterStore::new();
        store.set_float("color", 1.0);
        store.set_vec4("color", Vec4::ONE);

        assert_eq!(store.get_float("color").unwrap(), 1.0);
        assert_eq!(store.get_vec4("color").unwrap(), Vec4::ONE);
        assert!(store.get_vec3("color").is_err());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_reports_change() {
        let mut store = ParameterStore::new();
        assert!(store.set_float("a", 1.0));
        assert!(!store.set_float("a", 1.0));
        assert!(store.set_float("a", 2.0));

        assert!(store.set_vec3("p", Vec3::ONE));
        assert!(!store.set_vec3("p", Vec3::ONE));
    }

    #[test]
    fn test_uniforms_cover_every_parameter() {
        let mut store = ParameterStore::new();
        store.set_float("a", 1.0);
        store.set_vec3("b", Vec3::X);
        store.set_mat4("c", Mat4::IDENTITY);

        let uniforms: Vec<_> = store.uniforms().collect();
        assert_eq!(
            uniforms,
            vec![
                ("a", UniformValue::Float(1.0)),
                ("b", UniformValue::Vec3(Vec3::X)),
                ("c", UniformValue::Mat4(Mat4::IDENTITY)),
            ]
        );
    }

    #[test]
    fn test_serde_snapshot() {
        let mut store = ParameterStore::new();
        store.set_float("attenuation_constant", 1.0);
        store.set_vec3("world_direction", Vec3::NEG_Z);

        let json = serde_json::to_string(&store).unwrap();
        let restored: ParameterStore = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, store);
    }
}
