//! Shadow Coordination
//!
//! A light finds its shadow map as a sibling component on its owning node.
//! Whether the light casts a shadow is worked out from that sibling on every
//! query; nothing about it is cached on the light.

use void_scene::{NodeId, SceneGraph};

use super::map::{ShadowMap, ShadowMaterial};
use crate::error::{LightError, Result};

/// Shadow casting state of a light
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShadowState {
    /// No shadow map on the node
    NoShadow,
    /// A shadow map exists but is disabled or has no viewpoint
    ShadowRequested,
    /// The shadow map is enabled and has a viewpoint
    ShadowActive,
}

/// Owner back-reference plus sibling shadow-map lookups
#[derive(Clone, Copy, Debug, Default)]
pub struct ShadowCoordinator {
    owner: Option<NodeId>,
}

impl ShadowCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node owning the light
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<NodeId>) {
        self.owner = owner;
    }

    /// The sibling shadow map in whatever state it is
    pub fn shadow_map<'g>(&self, graph: &'g SceneGraph) -> Option<&'g ShadowMap> {
        graph.node(self.owner?)?.get::<ShadowMap>()
    }

    /// The sibling shadow map, only if it is enabled and has a viewpoint
    pub fn active_shadow_map<'g>(&self, graph: &'g SceneGraph) -> Option<&'g ShadowMap> {
        self.shadow_map(graph)
            .filter(|map| map.enabled() && map.viewpoint().is_some())
    }

    /// Current shadow state
    pub fn state(&self, graph: &SceneGraph) -> ShadowState {
        match self.shadow_map(graph) {
            None => ShadowState::NoShadow,
            Some(map) if map.enabled() && map.viewpoint().is_some() => ShadowState::ShadowActive,
            Some(_) => ShadowState::ShadowRequested,
        }
    }

    /// Attach a shadow map built from `material` unless one already exists.
    ///
    /// Returns true if a shadow map was created.
    pub fn request(&self, graph: &mut SceneGraph, material: ShadowMaterial) -> Result<bool> {
        let owner = self.owner.ok_or(LightError::Detached)?;
        if self.shadow_map(graph).is_some() {
            return Ok(false);
        }

        log::debug!(
            "Creating shadow map for {:?} (program '{}', {}px)",
            owner,
            material.program,
            material.settings.resolution
        );
        graph.attach_component(owner, Box::new(ShadowMap::new(material)))?;
        Ok(true)
    }
}
