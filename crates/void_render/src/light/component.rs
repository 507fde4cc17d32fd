//! Light Component
//!
//! The light attached to a scene node. It owns its parameters and the
//! per-program dirty flags, and refers to its node only through a weak
//! `NodeId` used to reach the sibling shadow map.
//!
//! # Update protocol
//!
//! - Writes while enabled mark every tracked program dirty. Scalar writes
//!   that don't change the value are ignored; vector and matrix writes
//!   always mark.
//! - Writes while disabled never mark. Re-enabling does not mark either, so
//!   a caller that changes nothing while the light is off gets the uniforms
//!   programs already hold.
//! - `refresh_uniforms` pushes everything to a dirty program, then clears
//!   that program's flag. A clean program costs one map lookup.
//! - Gaining, losing or moving a shadow-map slot marks programs dirty, since
//!   the depth texture's unit changes with it.

use std::any::Any;

use glam::{Mat4, Vec3, Vec4};
use void_scene::{Component, ComponentKind, ComponentType, NodeId, SceneGraph};
use void_shader::{ProgramId, ProgramManager, UniformKind, UniformValue};

use super::dirty::DirtyTracker;
use super::kind::{self, LightKind};
use super::params::ParameterStore;
use crate::error::{LightError, Result};
use crate::shadow::{ShadowCoordinator, ShadowMap, ShadowMaterial, ShadowPass, ShadowState};

/// Uniform suffix of the shadow depth texture
const SHADOW_TEXTURE: &str = "shadow_map";

/// A light source attached to a scene node
#[derive(Debug)]
pub struct LightComponent {
    kind: LightKind,
    enabled: bool,
    light_id: Option<String>,
    shadow_map_slot: Option<u32>,
    params: ParameterStore,
    dirty: DirtyTracker,
    shadow: ShadowCoordinator,
}

impl LightComponent {
    /// Create a detached, enabled light seeded with its kind's defaults
    pub fn new(kind: LightKind) -> Self {
        let mut params = ParameterStore::new();
        kind.seed(&mut params);
        Self::with_params(kind, params)
    }

    /// Restore a light from a parameter snapshot without seeding defaults.
    /// The result may be incomplete; `validate` reports what is missing.
    pub fn with_params(kind: LightKind, params: ParameterStore) -> Self {
        Self {
            kind,
            enabled: true,
            light_id: None,
            shadow_map_slot: None,
            params,
            dirty: DirtyTracker::new(),
            shadow: ShadowCoordinator::new(),
        }
    }

    pub fn directional() -> Self {
        Self::new(LightKind::Directional)
    }

    pub fn point() -> Self {
        Self::new(LightKind::Point)
    }

    pub fn spot() -> Self {
        Self::new(LightKind::Spot)
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(LightKind::Custom(name.into()))
    }

    pub fn kind(&self) -> &LightKind {
        &self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the light. Does not mark programs dirty.
    pub fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// ID assigned by the scene, if registered
    pub fn light_id(&self) -> Option<&str> {
        self.light_id.as_deref()
    }

    /// Assign the light's ID. An ID can be assigned once.
    pub fn set_light_id(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        match &self.light_id {
            Some(current) if *current == id => Ok(()),
            Some(current) => Err(LightError::LightIdAssigned {
                current: current.clone(),
                requested: id,
            }),
            None => {
                log::debug!("Light {:?} assigned ID '{}'", self.kind, id);
                self.light_id = Some(id);
                Ok(())
            }
        }
    }

    /// Node the light is attached to
    pub fn owner(&self) -> Option<NodeId> {
        self.shadow.owner()
    }

    /// Slot of the light's shadow map this frame
    pub fn shadow_map_slot(&self) -> Option<u32> {
        self.shadow_map_slot
    }

    pub(crate) fn release_shadow_map_slot(&mut self) {
        if self.shadow_map_slot.take().is_some() {
            self.mark_dirty();
        }
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    /// Write every parameter of a snapshot through the typed setters.
    /// Parameters the snapshot lacks keep their current values.
    pub fn load_params(&mut self, params: &ParameterStore) {
        for (name, value) in params.uniforms() {
            match value {
                UniformValue::Float(v) => self.set_float(name, v),
                UniformValue::Vec3(v) => self.set_vec3(name, v),
                UniformValue::Vec4(v) => self.set_vec4(name, v),
                UniformValue::Mat4(v) => self.set_mat4(name, v),
                UniformValue::Texture { .. } => {}
            }
        }
    }

    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    /// Check a program, registering it as dirty if unseen
    pub fn is_dirty(&mut self, program: ProgramId) -> bool {
        self.dirty.is_dirty(program)
    }

    fn mark_dirty(&mut self) {
        if self.enabled {
            self.dirty.mark_all_dirty();
        }
    }

    pub fn get_float(&self, name: &str) -> Result<f32> {
        self.params.get_float(name)
    }

    pub fn get_vec3(&self, name: &str) -> Result<Vec3> {
        self.params.get_vec3(name)
    }

    pub fn get_vec4(&self, name: &str) -> Result<Vec4> {
        self.params.get_vec4(name)
    }

    pub fn get_mat4(&self, name: &str) -> Option<Mat4> {
        self.params.get_mat4(name)
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        if self.params.set_float(name, value) {
            self.mark_dirty();
        }
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.params.set_vec3(name, value);
        self.mark_dirty();
    }

    pub fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.params.set_vec4(name, value);
        self.mark_dirty();
    }

    pub fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.params.set_mat4(name, value);
        self.mark_dirty();
    }

    /// Check that every parameter the light's kind requires is set
    pub fn validate(&self) -> Result<()> {
        for (ty, name) in self.kind.required() {
            match ty {
                UniformKind::Float => self.get_float(name).map(|_| ())?,
                UniformKind::Vec3 => self.get_vec3(name).map(|_| ())?,
                UniformKind::Vec4 => self.get_vec4(name).map(|_| ())?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Copy position and facing from a world transform.
    ///
    /// The light faces down its local -Z axis. Only values that moved are
    /// written.
    pub fn sync_transform(&mut self, world: Mat4) {
        if self.kind.uses_position() {
            let position = world.w_axis.truncate();
            if self.params.get_vec3(kind::WORLD_POSITION).ok() != Some(position) {
                self.set_vec3(kind::WORLD_POSITION, position);
            }
        }
        if self.kind.uses_direction() {
            let direction = (-world.z_axis.truncate()).normalize_or_zero();
            if self.params.get_vec3(kind::WORLD_DIRECTION).ok() != Some(direction) {
                self.set_vec3(kind::WORLD_DIRECTION, direction);
            }
        }
    }

    /// Copy position and facing from the owning node
    pub fn sync_from_owner(&mut self, graph: &SceneGraph) -> bool {
        match self.owner().and_then(|owner| graph.world_transform(owner)) {
            Some(world) => {
                self.sync_transform(world);
                true
            }
            None => false,
        }
    }

    /// Qualified uniform name of a parameter
    pub fn uniform_name(&self, param: &str) -> String {
        match &self.light_id {
            Some(id) => format!("{}.{}", id, param),
            None => param.to_string(),
        }
    }

    /// Cast shadows with `material`, creating the shadow map if the node has
    /// none. Returns true if a shadow map was created.
    pub fn cast_shadow(&mut self, graph: &mut SceneGraph, material: ShadowMaterial) -> Result<bool> {
        let created = self.shadow.request(graph, material)?;
        self.dirty.mark_all_dirty();
        Ok(created)
    }

    /// Shadow state, recomputed from the sibling shadow map
    pub fn shadow_state(&self, graph: &SceneGraph) -> ShadowState {
        self.shadow.state(graph)
    }

    /// Whether the shadow map is attached, enabled and has a viewpoint
    pub fn is_casting_shadow(&self, graph: &SceneGraph) -> bool {
        self.shadow_state(graph) == ShadowState::ShadowActive
    }

    /// The sibling shadow map, only while it is active
    pub fn active_shadow_map<'g>(&self, graph: &'g SceneGraph) -> Option<&'g ShadowMap> {
        self.shadow.active_shadow_map(graph)
    }

    /// Push the light's uniforms to `program` if its copy is stale.
    ///
    /// Uniforms the program does not declare are skipped. While the shadow is
    /// active its depth texture is bound at `shadow_texture_unit`; without a
    /// unit the texture is not bound. Returns true if anything was pushed.
    pub fn refresh_uniforms(
        &mut self,
        graph: &SceneGraph,
        manager: &mut dyn ProgramManager,
        program: ProgramId,
        shadow_texture_unit: Option<u32>,
    ) -> bool {
        if !self.dirty.is_dirty(program) {
            return false;
        }

        let mut uploaded = 0usize;
        for (param, value) in self.params.uniforms() {
            let name = self.uniform_name(param);
            if upload(manager, program, &name, value) {
                uploaded += 1;
            }
        }

        let shadow_map = self.active_shadow_map(graph);
        if let (Some(unit), Some(shadow_map)) = (shadow_texture_unit, shadow_map) {
            let name = self.uniform_name(SHADOW_TEXTURE);
            let value = UniformValue::Texture {
                unit,
                texture: shadow_map.depth_texture(),
            };
            if upload(manager, program, &name, value) {
                uploaded += 1;
            }
        }

        log::trace!(
            "Refreshed {} uniforms of '{}' for {:?}",
            uploaded,
            self.light_id().unwrap_or("<unregistered>"),
            program
        );
        self.dirty.clear(program);
        true
    }

    /// Render the shadow map if the shadow is active.
    ///
    /// Keeps the light's shadow matrix current and records `texture_slot` as
    /// its shadow-map slot. A slot change marks programs dirty so they rebind
    /// the depth texture. Returns true if the pass drew anything.
    pub fn prepare_shadow_map(
        &mut self,
        graph: &SceneGraph,
        pass: &mut dyn ShadowPass,
        manager: &mut dyn ProgramManager,
        texture_slot: u32,
    ) -> bool {
        let (Some(owner), Some(shadow_map)) = (self.owner(), self.active_shadow_map(graph)) else {
            self.release_shadow_map_slot();
            return false;
        };

        if let Some(matrix) = shadow_map.shadow_matrix() {
            if self.get_mat4(kind::SHADOW_MATRIX) != Some(matrix) {
                self.set_mat4(kind::SHADOW_MATRIX, matrix);
            }
        }
        if self.shadow_map_slot != Some(texture_slot) {
            self.shadow_map_slot = Some(texture_slot);
            self.mark_dirty();
        }
        pass.render_shadow_map(graph, owner, shadow_map, manager)
    }
}

/// Resolve and upload one uniform; unresolved names are skipped
fn upload(
    manager: &mut dyn ProgramManager,
    program: ProgramId,
    name: &str,
    value: UniformValue,
) -> bool {
    let Some(location) = manager.uniform_location(program, name) else {
        return false;
    };
    match manager.upload(program, location, value) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to upload light uniform '{}': {}", name, e);
            false
        }
    }
}

impl Component for LightComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::LIGHT
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn on_attach(&mut self, owner: NodeId) {
        self.shadow.set_owner(Some(owner));
    }

    fn on_detach(&mut self) {
        self.shadow.set_owner(None);
        self.shadow_map_slot = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentKind for LightComponent {
    const TYPE: ComponentType = ComponentType::LIGHT;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shadow::Viewpoint;
    use std::collections::HashMap;
    use void_shader::{ShaderError, UniformLocation};

    const P1: ProgramId = ProgramId::new(1);
    const P2: ProgramId = ProgramId::new(2);

    /// Program manager that declares every name it is asked about
    #[derive(Default)]
    struct RecordingManager {
        locations: HashMap<String, UniformLocation>,
        uploads: Vec<(ProgramId, String, UniformValue)>,
        hidden: Vec<String>,
    }

    impl RecordingManager {
        fn names(&self, program: ProgramId) -> Vec<&str> {
            self.uploads
                .iter()
                .filter(|(p, _, _)| *p == program)
                .map(|(_, n, _)| n.as_str())
                .collect()
        }

        fn name_of(&self, location: UniformLocation) -> String {
            self.locations
                .iter()
                .find(|(_, l)| **l == location)
                .map(|(n, _)| n.clone())
                .unwrap_or_default()
        }
    }

    impl ProgramManager for RecordingManager {
        fn uniform_location(&self, _program: ProgramId, name: &str) -> Option<UniformLocation> {
            if self.hidden.iter().any(|h| h == name) {
                return None;
            }
            self.locations.get(name).copied()
        }

        fn upload(
            &mut self,
            program: ProgramId,
            location: UniformLocation,
            value: UniformValue,
        ) -> std::result::Result<(), ShaderError> {
            let name = self.name_of(location);
            self.uploads.push((program, name, value));
            Ok(())
        }
    }

    fn manager_for(light: &LightComponent) -> RecordingManager {
        let mut manager = RecordingManager::default();
        let names = light
            .params()
            .uniforms()
            .map(|(n, _)| light.uniform_name(n))
            .chain([light.uniform_name(SHADOW_TEXTURE), light.uniform_name("position")]);
        for (i, name) in names.enumerate() {
            manager.locations.insert(name, UniformLocation::new(i as u32));
        }
        manager
    }

    fn attached(graph: &mut SceneGraph, light: LightComponent) -> NodeId {
        let node = graph.create_node("lamp");
        graph.attach_component(node, Box::new(light)).unwrap();
        node
    }

    #[test]
    fn test_new_light_is_valid_and_enabled() {
        for light in [
            LightComponent::directional(),
            LightComponent::point(),
            LightComponent::spot(),
            LightComponent::custom("area"),
        ] {
            assert!(light.is_enabled());
            assert!(light.validate().is_ok());
            assert!(light.light_id().is_none());
            assert!(light.shadow_map_slot().is_none());
        }
    }

    #[test]
    fn test_validate_reports_missing_parameter() {
        let light = LightComponent::with_params(LightKind::Point, ParameterStore::new());
        assert!(matches!(
            light.validate(),
            Err(LightError::ParameterNotFound { .. })
        ));
    }

    #[test]
    fn test_load_params_overwrites_and_keeps_the_rest() {
        let mut light = LightComponent::point();
        light.is_dirty(P1);
        light.dirty.clear(P1);

        let mut snapshot = ParameterStore::new();
        snapshot.set_float(kind::ATTENUATION_LINEAR, 0.2);
        snapshot.set_mat4("sm0", Mat4::IDENTITY);
        light.load_params(&snapshot);

        assert_eq!(light.get_float(kind::ATTENUATION_LINEAR).unwrap(), 0.2);
        assert_eq!(light.get_float(kind::ATTENUATION_CONSTANT).unwrap(), 1.0);
        assert_eq!(light.get_mat4("sm0"), Some(Mat4::IDENTITY));
        assert!(light.is_dirty(P1));

        // An empty snapshot removes nothing
        light.dirty.clear(P1);
        light.load_params(&ParameterStore::new());
        assert!(light.validate().is_ok());
        assert_eq!(light.get_float(kind::ATTENUATION_LINEAR).unwrap(), 0.2);
        assert!(!light.is_dirty(P1));
    }

    #[test]
    fn test_scalar_write_marks_only_on_change() {
        let mut light = LightComponent::point();
        light.is_dirty(P1);
        light.dirty.clear(P1);

        light.set_float(kind::ATTENUATION_CONSTANT, 1.0);
        assert!(!light.is_dirty(P1));

        light.set_float(kind::ATTENUATION_CONSTANT, 0.5);
        assert!(light.is_dirty(P1));
    }

    #[test]
    fn test_vector_and_matrix_writes_always_mark() {
        let mut light = LightComponent::point();
        light.is_dirty(P1);

        light.dirty.clear(P1);
        light.set_vec3(kind::WORLD_POSITION, Vec3::ZERO);
        assert!(light.is_dirty(P1));

        light.dirty.clear(P1);
        light.set_vec4(kind::DIFFUSE_INTENSITY, Vec4::ONE);
        assert!(light.is_dirty(P1));

        light.dirty.clear(P1);
        light.set_mat4("sm0", Mat4::IDENTITY);
        light.set_mat4("sm0", Mat4::IDENTITY);
        assert!(light.is_dirty(P1));
    }

    #[test]
    fn test_disabled_writes_do_not_mark() {
        let mut light = LightComponent::point();
        light.is_dirty(P1);
        light.dirty.clear(P1);

        light.enable(false);
        light.set_float(kind::ATTENUATION_LINEAR, 0.7);
        light.set_vec3(kind::WORLD_POSITION, Vec3::X);
        light.set_mat4("sm0", Mat4::IDENTITY);
        assert!(!light.is_dirty(P1));

        // Re-enabling does not mark either
        light.enable(true);
        assert!(!light.is_dirty(P1));
        assert_eq!(light.get_float(kind::ATTENUATION_LINEAR).unwrap(), 0.7);
    }

    #[test]
    fn test_light_id_assigned_once() {
        let mut light = LightComponent::spot();
        light.set_light_id("spot0").unwrap();
        light.set_light_id("spot0").unwrap();

        assert!(matches!(
            light.set_light_id("spot1"),
            Err(LightError::LightIdAssigned { .. })
        ));
        assert_eq!(light.light_id(), Some("spot0"));
        assert_eq!(light.uniform_name("world_position"), "spot0.world_position");
    }

    #[test]
    fn test_refresh_twice_pushes_once() {
        let graph = SceneGraph::new();
        let mut light = LightComponent::point();
        light.set_light_id("point0").unwrap();
        let mut manager = manager_for(&light);

        assert!(light.refresh_uniforms(&graph, &mut manager, P1, None));
        let pushed = manager.uploads.len();
        assert_eq!(pushed, light.params().len());

        assert!(!light.refresh_uniforms(&graph, &mut manager, P1, None));
        assert_eq!(manager.uploads.len(), pushed);
    }

    #[test]
    fn test_refresh_skips_undeclared_uniforms() {
        let graph = SceneGraph::new();
        let mut light = LightComponent::point();
        light.set_light_id("point0").unwrap();
        let mut manager = manager_for(&light);
        manager.hidden.push("point0.attenuation_quadratic".into());

        assert!(light.refresh_uniforms(&graph, &mut manager, P1, None));
        let names = manager.names(P1);
        assert!(!names.contains(&"point0.attenuation_quadratic"));
        assert!(names.contains(&"point0.attenuation_linear"));
        assert!(!light.is_dirty(P1));
    }

    #[test]
    fn test_position_refresh_across_two_programs() {
        let graph = SceneGraph::new();
        let mut light = LightComponent::custom("lamp");
        let mut manager = manager_for(&light);

        light.is_dirty(P1);
        light.is_dirty(P2);
        light.dirty.clear(P1);
        light.dirty.clear(P2);

        light.set_vec3("position", Vec3::new(1.0, 2.0, 3.0));

        assert!(light.refresh_uniforms(&graph, &mut manager, P1, None));
        assert!(!light.dirty().peek(P1));
        assert!(light.dirty().peek(P2));

        assert!(light.refresh_uniforms(&graph, &mut manager, P2, None));
        assert!(!light.dirty().peek(P2));

        let position = manager
            .uploads
            .iter()
            .find(|(p, n, _)| *p == P2 && n == "position")
            .map(|(_, _, v)| *v);
        assert_eq!(position, Some(UniformValue::Vec3(Vec3::new(1.0, 2.0, 3.0))));
    }

    #[test]
    fn test_sync_transform_writes_only_moves() {
        let mut light = LightComponent::spot();
        light.is_dirty(P1);
        light.dirty.clear(P1);

        light.sync_transform(Mat4::IDENTITY);
        assert!(!light.is_dirty(P1));

        light.sync_transform(Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));
        assert!(light.is_dirty(P1));
        assert_eq!(
            light.get_vec3(kind::WORLD_POSITION).unwrap(),
            Vec3::new(0.0, 5.0, 0.0)
        );
        assert_eq!(light.get_vec3(kind::WORLD_DIRECTION).unwrap(), Vec3::NEG_Z);
    }

    #[test]
    fn test_cast_shadow_requires_owner() {
        let mut graph = SceneGraph::new();
        let mut light = LightComponent::directional();
        assert!(matches!(
            light.cast_shadow(&mut graph, ShadowMaterial::new("depth")),
            Err(LightError::Detached)
        ));
    }

    #[test]
    fn test_cast_shadow_lifecycle() {
        let mut graph = SceneGraph::new();
        let node = attached(&mut graph, LightComponent::directional());

        let casting = |graph: &mut SceneGraph| {
            graph
                .component_scope::<LightComponent, _>(node, |light, graph| {
                    light.is_casting_shadow(graph)
                })
                .unwrap()
        };
        assert!(!casting(&mut graph));

        let created = graph
            .component_scope::<LightComponent, _>(node, |light, graph| {
                light.cast_shadow(graph, ShadowMaterial::new("depth"))
            })
            .unwrap()
            .unwrap();
        assert!(created);
        assert!(!casting(&mut graph));

        let world = Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0));
        let map = graph.node_mut(node).unwrap().get_mut::<ShadowMap>().unwrap();
        map.set_viewpoint(Viewpoint::orthographic(world, 10.0, 0.1, 50.0));
        assert!(casting(&mut graph));

        let map = graph.node_mut(node).unwrap().get_mut::<ShadowMap>().unwrap();
        map.set_enabled(false);
        assert!(!casting(&mut graph));
    }

    struct NullPass;

    impl ShadowPass for NullPass {
        fn render_shadow_map(
            &mut self,
            _graph: &SceneGraph,
            _light_node: NodeId,
            _shadow_map: &ShadowMap,
            _manager: &mut dyn ProgramManager,
        ) -> bool {
            true
        }
    }

    #[test]
    fn test_slot_change_marks_dirty() {
        let mut graph = SceneGraph::new();
        let node = attached(&mut graph, LightComponent::spot());
        graph
            .component_scope::<LightComponent, _>(node, |light, graph| {
                light.cast_shadow(graph, ShadowMaterial::new("depth"))
            })
            .unwrap()
            .unwrap();
        graph
            .node_mut(node)
            .unwrap()
            .get_mut::<ShadowMap>()
            .unwrap()
            .set_viewpoint(Viewpoint::perspective(Mat4::IDENTITY, 1.0, 0.1, 30.0));

        graph
            .component_scope::<LightComponent, _>(node, |light, graph| {
                let mut manager = RecordingManager::default();
                assert!(light.prepare_shadow_map(graph, &mut NullPass, &mut manager, 1));
                light.is_dirty(P1);
                light.dirty.clear(P1);

                // Same slot, same viewpoint
                light.prepare_shadow_map(graph, &mut NullPass, &mut manager, 1);
                assert!(!light.is_dirty(P1));

                light.prepare_shadow_map(graph, &mut NullPass, &mut manager, 0);
                assert_eq!(light.shadow_map_slot(), Some(0));
                assert!(light.is_dirty(P1));

                light.dirty.clear(P1);
                light.release_shadow_map_slot();
                assert_eq!(light.shadow_map_slot(), None);
                assert!(light.is_dirty(P1));
            })
            .unwrap();
    }

    #[test]
    fn test_detach_clears_owner() {
        let mut graph = SceneGraph::new();
        let node = attached(&mut graph, LightComponent::point());
        assert_eq!(
            graph.node(node).unwrap().get::<LightComponent>().unwrap().owner(),
            Some(node)
        );

        let detached = graph.detach_component(node, ComponentType::LIGHT).unwrap();
        let light = (*detached).downcast_ref::<LightComponent>().unwrap();
        assert!(light.owner().is_none());
    }
}
