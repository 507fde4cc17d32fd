//! Light Registry
//!
//! Scene-level bookkeeping for lights: hands out light IDs at registration,
//! and drives the two per-frame passes over every registered light.
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = LightRegistry::new(LightingConfig::default());
//! let mut slots = registry.create_slot_table();
//!
//! graph.attach_component(lamp, Box::new(LightComponent::spot()))?;
//! let id = registry.add_light(&mut graph, lamp)?; // "spot0"
//!
//! // Per frame
//! registry.sync_transforms(&mut graph);
//! registry.prepare_shadow_maps(&mut graph, &mut depth_pass, &mut programs, &mut slots);
//! for program in programs_in_use {
//!     registry.refresh_uniforms(&mut graph, &mut programs, program, SHADOW_TEXTURE_BASE);
//! }
//! ```

use serde::{Deserialize, Serialize};
use void_scene::{ComponentType, NodeId, SceneError, SceneGraph};
use void_shader::{ProgramId, ProgramManager};

use super::component::LightComponent;
use crate::error::{LightError, Result};
use crate::shadow::{LightingConfig, ShadowMaterial, ShadowPass, ShadowSlotTable};

#[derive(Clone, Debug)]
struct RegisteredLight {
    node: NodeId,
    id: String,
}

/// Counters from the last passes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightStats {
    /// Registered lights
    pub registered: usize,
    /// Lights that pushed uniforms in the last refresh
    pub refreshed: usize,
    /// Shadow maps handed to the pass in the last prepare
    pub shadow_maps_prepared: usize,
    /// Shadow maps the pass drew in the last prepare
    pub shadow_maps_rendered: usize,
    /// Registered lights whose node or component has gone
    pub missing: usize,
}

/// Registry of the lights in a scene
pub struct LightRegistry {
    config: LightingConfig,
    lights: Vec<RegisteredLight>,
    next_index: u64,
    stats: LightStats,
}

impl LightRegistry {
    /// Create a registry
    pub fn new(mut config: LightingConfig) -> Self {
        config.validate();
        Self {
            config,
            lights: Vec::new(),
            next_index: 0,
            stats: LightStats::default(),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &LightingConfig {
        &self.config
    }

    /// Shadow material for `program` with the configured default settings
    pub fn shadow_material(&self, program: impl Into<String>) -> ShadowMaterial {
        ShadowMaterial::new(program).with_settings(self.config.default_shadow.clone())
    }

    /// A slot table sized for this registry's configuration
    pub fn create_slot_table(&self) -> ShadowSlotTable {
        ShadowSlotTable::new(self.config.shadow_slots)
    }

    /// Register the light on `node` and assign its ID
    pub fn add_light(&mut self, graph: &mut SceneGraph, node: NodeId) -> Result<String> {
        if self.contains(node) {
            return Err(LightError::AlreadyRegistered(node));
        }
        if self.lights.len() >= self.config.max_lights {
            return Err(LightError::TooManyLights(self.config.max_lights));
        }

        let light = graph
            .node_mut(node)
            .ok_or(SceneError::NodeNotFound(node))?
            .get_mut::<LightComponent>()
            .ok_or(LightError::NotALight(node))?;
        light.validate()?;

        // Custom prefixes ending in digits can collide with a later counter
        let id = loop {
            let candidate = format!("{}{}", light.kind().prefix(), self.next_index);
            self.next_index += 1;
            if !self.lights.iter().any(|l| l.id == candidate) {
                break candidate;
            }
        };
        light.set_light_id(id.clone())?;

        log::debug!("Registered light '{}' on {:?}", id, node);
        self.lights.push(RegisteredLight {
            node,
            id: id.clone(),
        });
        self.stats.registered = self.lights.len();
        Ok(id)
    }

    /// Unregister the light on `node`, release its shadow slot and detach it
    /// together with its shadow map. Returns the light's ID.
    pub fn remove_light(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        slots: &mut ShadowSlotTable,
    ) -> Result<String> {
        let index = self
            .lights
            .iter()
            .position(|l| l.node == node)
            .ok_or(LightError::NotRegistered(node))?;
        let RegisteredLight { id, .. } = self.lights.remove(index);
        self.stats.registered = self.lights.len();
        slots.release(&id);

        if graph.contains(node) {
            for ty in [ComponentType::SHADOW_MAP, ComponentType::LIGHT] {
                match graph.detach_component(node, ty) {
                    Ok(_) | Err(SceneError::ComponentNotFound { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        log::debug!("Removed light '{}' from {:?}", id, node);
        Ok(id)
    }

    /// Copy every light's position and facing from its node
    pub fn sync_transforms(&mut self, graph: &mut SceneGraph) -> usize {
        let mut synced = 0;
        for entry in &self.lights {
            let Some(world) = graph.world_transform(entry.node) else {
                continue;
            };
            if let Some(light) = graph
                .node_mut(entry.node)
                .and_then(|n| n.get_mut::<LightComponent>())
            {
                light.sync_transform(world);
                synced += 1;
            }
        }
        synced
    }

    /// Render the shadow map of every enabled light that casts one.
    ///
    /// Casting lights get a slot from `slots`; lights that stopped casting
    /// give theirs back. Returns the number of shadow maps drawn.
    pub fn prepare_shadow_maps(
        &mut self,
        graph: &mut SceneGraph,
        pass: &mut dyn ShadowPass,
        manager: &mut dyn ProgramManager,
        slots: &mut ShadowSlotTable,
    ) -> usize {
        slots.begin_frame();

        let mut prepared = 0;
        let mut rendered = 0;
        let mut missing = 0;
        for entry in &self.lights {
            let outcome = graph.component_scope::<LightComponent, _>(entry.node, |light, graph| {
                if light.is_enabled() && light.is_casting_shadow(graph) {
                    match slots.allocate(&entry.id) {
                        Some(slot) => {
                            return Some(light.prepare_shadow_map(graph, pass, manager, slot))
                        }
                        None => log::warn!("No free shadow slot for light '{}'", entry.id),
                    }
                }
                slots.release(&entry.id);
                light.release_shadow_map_slot();
                None
            });

            match outcome {
                Ok(Some(drawn)) => {
                    prepared += 1;
                    if drawn {
                        rendered += 1;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    missing += 1;
                    log::warn!("Skipping shadow of light '{}': {}", entry.id, e);
                }
            }
        }

        self.stats.shadow_maps_prepared = prepared;
        self.stats.shadow_maps_rendered = rendered;
        self.stats.missing = missing;
        rendered
    }

    /// Refresh every enabled light's uniforms for `program`.
    ///
    /// A light's shadow texture is bound at `base_texture_unit` plus its
    /// shadow-map slot; a light without a slot this frame binds none.
    /// Returns the number of lights that pushed uniforms.
    pub fn refresh_uniforms(
        &mut self,
        graph: &mut SceneGraph,
        manager: &mut dyn ProgramManager,
        program: ProgramId,
        base_texture_unit: u32,
    ) -> usize {
        let mut refreshed = 0;
        let mut missing = 0;
        for entry in &self.lights {
            let outcome = graph.component_scope::<LightComponent, _>(entry.node, |light, graph| {
                if !light.is_enabled() {
                    return false;
                }
                let unit = light
                    .shadow_map_slot()
                    .map(|slot| base_texture_unit.saturating_add(slot));
                light.refresh_uniforms(graph, manager, program, unit)
            });

            match outcome {
                Ok(true) => refreshed += 1,
                Ok(false) => {}
                Err(e) => {
                    missing += 1;
                    log::warn!("Skipping uniforms of light '{}': {}", entry.id, e);
                }
            }
        }

        self.stats.refreshed = refreshed;
        self.stats.missing = missing;
        refreshed
    }

    /// Check if the light on `node` is registered
    pub fn contains(&self, node: NodeId) -> bool {
        self.lights.iter().any(|l| l.node == node)
    }

    /// ID of the light on `node`
    pub fn light_id(&self, node: NodeId) -> Option<&str> {
        self.lights
            .iter()
            .find(|l| l.node == node)
            .map(|l| l.id.as_str())
    }

    /// Node carrying the light with `id`
    pub fn node_of(&self, id: &str) -> Option<NodeId> {
        self.lights.iter().find(|l| l.id == id).map(|l| l.node)
    }

    /// Registered lights in registration order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.lights.iter().map(|l| (l.node, l.id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Counters from the last passes
    pub fn stats(&self) -> &LightStats {
        &self.stats
    }
}

impl Default for LightRegistry {
    fn default() -> Self {
        Self::new(LightingConfig::default())
    }
}
