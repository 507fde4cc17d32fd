//! Component - Capabilities attached to scene nodes
//!
//! Nodes discover their siblings by component type, not by concrete Rust
//! type, so a renderer can ask "is there a shadow map here?" without knowing
//! which implementation provides it.

use core::any::Any;
use core::fmt;

use crate::arena::ArenaKey;
use crate::graph::NodeId;

/// Identifier for a kind of component
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentType(u64);

impl ComponentType {
    /// Camera / viewpoint
    pub const CAMERA: Self = Self(1);
    /// Light source
    pub const LIGHT: Self = Self(2);
    /// Depth-only render target used for shadow casting
    pub const SHADOW_MAP: Self = Self(3);

    /// Create from a raw value
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Derive an identifier from a name (FNV-1a)
    ///
    /// The high bit is always set so derived types never collide with the
    /// built-in constants.
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = 0xcbf29ce484222325u64;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(0x100000001b3);
            i += 1;
        }
        Self(hash | 1 << 63)
    }

    /// Get the raw value
    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::CAMERA => write!(f, "ComponentType(camera)"),
            Self::LIGHT => write!(f, "ComponentType(light)"),
            Self::SHADOW_MAP => write!(f, "ComponentType(shadow_map)"),
            Self(raw) => write!(f, "ComponentType({:#x})", raw),
        }
    }
}

/// Behavior shared by everything that can be attached to a node
pub trait Component: Any {
    /// The capability this component provides
    fn component_type(&self) -> ComponentType;

    /// Whether the component currently participates in rendering
    fn is_enabled(&self) -> bool {
        true
    }

    /// Called after the component has been attached to `owner`
    fn on_attach(&mut self, _owner: NodeId) {}

    /// Called after the component has been detached from its node
    fn on_detach(&mut self) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A component with a statically known type identifier
pub trait ComponentKind: Component + Sized {
    const TYPE: ComponentType;
}

impl dyn Component {
    /// Downcast to a concrete component
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Downcast to a mutable concrete component
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

/// Key of a component inside its node's component list
pub type ComponentKey = ArenaKey<Box<dyn Component>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_types_are_stable() {
        assert_eq!(
            ComponentType::from_name("probe"),
            ComponentType::from_name("probe")
        );
        assert_ne!(
            ComponentType::from_name("probe"),
            ComponentType::from_name("decal")
        );
    }

    #[test]
    fn test_named_types_avoid_builtins() {
        for name in ["", "a", "light", "shadow_map"] {
            let ty = ComponentType::from_name(name);
            assert_ne!(ty, ComponentType::CAMERA);
            assert_ne!(ty, ComponentType::LIGHT);
            assert_ne!(ty, ComponentType::SHADOW_MAP);
        }
    }
}
