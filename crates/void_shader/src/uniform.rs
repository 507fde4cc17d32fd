//! Uniform vocabulary shared by programs and the things that feed them

use core::fmt;

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Identifier of a linked rendering program
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProgramId(u32);

impl ProgramId {
    /// Create from a raw value
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw value
    #[inline]
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProgramId({})", self.0)
    }
}

/// Binding location of a uniform inside one program
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniformLocation(u32);

impl UniformLocation {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

/// Opaque handle to a GPU texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(u32);

impl TextureHandle {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

/// Type of a uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniformKind {
    Float,
    Vec3,
    Vec4,
    Mat4,
    /// Sampled texture bound to a texture unit
    Texture,
}

impl UniformKind {
    /// Size in bytes inside a uniform block (textures live outside blocks)
    pub const fn size(&self) -> u32 {
        match self {
            Self::Float => 4,
            Self::Vec3 => 12,
            Self::Vec4 => 16,
            Self::Mat4 => 64,
            Self::Texture => 0,
        }
    }

    /// std140 base alignment
    pub const fn align(&self) -> u32 {
        match self {
            Self::Float => 4,
            Self::Vec3 | Self::Vec4 | Self::Mat4 => 16,
            Self::Texture => 1,
        }
    }
}

/// A typed value ready for upload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Texture { unit: u32, texture: TextureHandle },
}

impl UniformValue {
    /// The kind of this value
    pub fn kind(&self) -> UniformKind {
        match self {
            Self::Float(_) => UniformKind::Float,
            Self::Vec3(_) => UniformKind::Vec3,
            Self::Vec4(_) => UniformKind::Vec4,
            Self::Mat4(_) => UniformKind::Mat4,
            Self::Texture { .. } => UniformKind::Texture,
        }
    }

    /// Bytes as laid out in a uniform block. Empty for textures.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Float(v) => bytemuck::bytes_of(v).to_vec(),
            Self::Vec3(v) => bytemuck::bytes_of(v).to_vec(),
            Self::Vec4(v) => bytemuck::bytes_of(v).to_vec(),
            Self::Mat4(m) => bytemuck::bytes_of(m).to_vec(),
            Self::Texture { .. } => Vec::new(),
        }
    }
}

/// A uniform declared by a program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformDecl {
    /// Fully qualified name (`block.member` for block members)
    pub name: String,
    /// Declared type
    pub kind: UniformKind,
    /// Byte offset in the program's uniform block
    pub offset: u32,
}

impl UniformDecl {
    pub fn new(name: impl Into<String>, kind: UniformKind, offset: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_bytes_match_kind_size() {
        let values = [
            UniformValue::Float(1.0),
            UniformValue::Vec3(Vec3::ONE),
            UniformValue::Vec4(Vec4::ONE),
            UniformValue::Mat4(Mat4::IDENTITY),
        ];
        for value in values {
            assert_eq!(value.to_bytes().len() as u32, value.kind().size());
        }
    }

    #[test]
    fn test_texture_has_no_block_bytes() {
        let value = UniformValue::Texture {
            unit: 3,
            texture: TextureHandle::new(9),
        };
        assert_eq!(value.kind(), UniformKind::Texture);
        assert!(value.to_bytes().is_empty());
    }
}
