//! Scene graph - Nodes, hierarchy and component attachment
//!
//! The graph owns its nodes, and each node owns its components. Components
//! refer back to their node only through a [`NodeId`], which never keeps the
//! node alive.

use std::collections::BTreeMap;

use glam::Mat4;

use crate::arena::{Arena, ArenaKey};
use crate::component::{Component, ComponentKey, ComponentKind, ComponentType};
use crate::error::{Result, SceneError};

/// Identifier of a node in a [`SceneGraph`]
pub type NodeId = ArenaKey<SceneNode>;

/// A node in the scene graph
pub struct SceneNode {
    name: String,
    local_transform: Mat4,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    components: Arena<Box<dyn Component>>,
    by_type: BTreeMap<ComponentType, ComponentKey>,
}

impl SceneNode {
    fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            local_transform: Mat4::IDENTITY,
            parent,
            children: Vec::new(),
            components: Arena::new(),
            by_type: BTreeMap::new(),
        }
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> Mat4 {
        self.local_transform
    }

    /// Parent node, if any
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Look up a sibling component by capability
    pub fn get_component(&self, ty: ComponentType) -> Option<&(dyn Component + 'static)> {
        let key = self.by_type.get(&ty)?;
        self.components.get(*key).map(|c| &**c)
    }

    /// Look up a sibling component by capability, mutably
    pub fn get_component_mut(
        &mut self,
        ty: ComponentType,
    ) -> Option<&mut (dyn Component + 'static)> {
        let key = self.by_type.get(&ty)?;
        self.components.get_mut(*key).map(|c| &mut **c)
    }

    /// Typed lookup
    pub fn get<T: ComponentKind>(&self) -> Option<&T> {
        self.get_component(T::TYPE)?.downcast_ref()
    }

    /// Typed mutable lookup
    pub fn get_mut<T: ComponentKind>(&mut self) -> Option<&mut T> {
        self.get_component_mut(T::TYPE)?.downcast_mut()
    }

    /// Whether a component of this type is attached and not borrowed out
    pub fn has_component(&self, ty: ComponentType) -> bool {
        self.get_component(ty).is_some()
    }

    /// Types of all attached components
    pub fn component_types(&self) -> impl Iterator<Item = ComponentType> + '_ {
        self.by_type.keys().copied()
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.by_type.len()
    }
}

/// Scene graph
#[derive(Default)]
pub struct SceneGraph {
    nodes: Arena<SceneNode>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root node
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.nodes.insert(SceneNode::new(name, None));
        self.roots.push(id);
        id
    }

    /// Create a node under `parent`
    pub fn create_child(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = self.nodes.insert(SceneNode::new(name, Some(parent)));
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    /// Remove a node and its whole subtree, detaching every component
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        let parent = self.node(id).ok_or(SceneError::NodeNotFound(id))?.parent;

        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent_node) => parent_node.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(mut node) = self.nodes.remove(current) else {
                continue;
            };
            stack.extend(node.children.iter().copied());
            for (_, component) in node.components.iter_mut() {
                component.on_detach();
            }
            log::debug!(
                "Removed node '{}' with {} component(s)",
                node.name,
                node.by_type.len()
            );
        }
        Ok(())
    }

    /// Get a node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Get a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Whether the node exists
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Root nodes in creation order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach a component. A node holds at most one component per type.
    pub fn attach_component(
        &mut self,
        node: NodeId,
        mut component: Box<dyn Component>,
    ) -> Result<ComponentKey> {
        let ty = component.component_type();
        let target = self.nodes.get_mut(node).ok_or(SceneError::NodeNotFound(node))?;
        if target.by_type.contains_key(&ty) {
            return Err(SceneError::ComponentTypeOccupied { node, component: ty });
        }

        component.on_attach(node);
        let key = target.components.insert(component);
        target.by_type.insert(ty, key);
        Ok(key)
    }

    /// Detach a component and hand it back to the caller
    pub fn detach_component(
        &mut self,
        node: NodeId,
        ty: ComponentType,
    ) -> Result<Box<dyn Component>> {
        let target = self.nodes.get_mut(node).ok_or(SceneError::NodeNotFound(node))?;
        let key = *target
            .by_type
            .get(&ty)
            .ok_or(SceneError::ComponentNotFound { node, component: ty })?;
        if target.components.is_reserved(key) {
            return Err(SceneError::ComponentBusy { node, component: ty });
        }

        target.by_type.remove(&ty);
        let mut component = target
            .components
            .remove(key)
            .ok_or(SceneError::ComponentNotFound { node, component: ty })?;
        component.on_detach();
        Ok(component)
    }

    /// Replace a node's local transform
    pub fn set_local_transform(&mut self, node: NodeId, transform: Mat4) -> Result<()> {
        let target = self.nodes.get_mut(node).ok_or(SceneError::NodeNotFound(node))?;
        target.local_transform = transform;
        Ok(())
    }

    /// Local-to-world transform of a node
    pub fn world_transform(&self, node: NodeId) -> Option<Mat4> {
        let mut current = self.nodes.get(node)?;
        let mut world = current.local_transform;
        while let Some(parent) = current.parent.and_then(|p| self.nodes.get(p)) {
            world = parent.local_transform * world;
            current = parent;
        }
        Some(world)
    }

    /// Borrow a component mutably together with the rest of the graph.
    ///
    /// The component's slot is vacated while `f` runs, so `f` may look up
    /// siblings on the same node or attach new ones. The slot's type stays
    /// reserved in the meantime. If `f` removes the node, the component is
    /// detached and dropped.
    pub fn component_scope<T, R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut T, &mut SceneGraph) -> R,
    ) -> Result<R>
    where
        T: ComponentKind,
    {
        let target = self.nodes.get_mut(node).ok_or(SceneError::NodeNotFound(node))?;
        let key = *target
            .by_type
            .get(&T::TYPE)
            .ok_or(SceneError::ComponentNotFound { node, component: T::TYPE })?;
        let mut boxed = target
            .components
            .take(key)
            .ok_or(SceneError::ComponentBusy { node, component: T::TYPE })?;

        let result = match (*boxed).downcast_mut::<T>() {
            Some(component) => Ok(f(component, self)),
            None => Err(SceneError::ComponentTypeMismatch { node, component: T::TYPE }),
        };

        let returned = match self.nodes.get_mut(node) {
            Some(target) => target.components.restore(key, boxed),
            None => Err(boxed),
        };
        if let Err(mut orphan) = returned {
            log::warn!(
                "Node {:?} vanished while its {:?} was borrowed; dropping component",
                node,
                T::TYPE
            );
            orphan.on_detach();
        }

        result
    }
}
