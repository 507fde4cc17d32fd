//! Uniform descriptors
//!
//! A compact textual declaration of a program's uniforms for programs that
//! are not authored in WGSL:
//!
//! ```text
//! float4 light0.diffuse_intensity float3 light0.world_position
//! float light0.attenuation_constant mat4 light0.sm0 sampler2D light0.shadow_map
//! ```
//!
//! Whitespace or commas separate tokens; each declaration is a type followed
//! by a name. Offsets follow std140 packing in declaration order.

use crate::reflect::{align_to, UniformReflection};
use crate::uniform::{UniformDecl, UniformKind};
use crate::ShaderError;

/// Parse a descriptor into declarations
pub fn parse_descriptor(descriptor: &str) -> Result<UniformReflection, ShaderError> {
    let mut tokens = descriptor
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty());

    let mut reflection = UniformReflection::default();
    while let Some(type_name) = tokens.next() {
        let kind = parse_kind(type_name).ok_or_else(|| {
            ShaderError::Descriptor(format!("unknown uniform type '{}'", type_name))
        })?;
        let name = tokens.next().ok_or_else(|| {
            ShaderError::Descriptor(format!("missing name after '{}'", type_name))
        })?;
        if reflection.uniforms.iter().any(|u| u.name == name) {
            return Err(ShaderError::Descriptor(format!("duplicate uniform '{}'", name)));
        }

        let offset = if kind == UniformKind::Texture {
            0
        } else {
            let offset = align_to(reflection.block_size, kind.align());
            reflection.block_size = offset + kind.size();
            offset
        };
        reflection.uniforms.push(UniformDecl::new(name, kind, offset));
    }

    Ok(reflection)
}

fn parse_kind(token: &str) -> Option<UniformKind> {
    match token {
        "float" => Some(UniformKind::Float),
        "float3" | "vec3" => Some(UniformKind::Vec3),
        "float4" | "vec4" => Some(UniformKind::Vec4),
        "mat4" | "float4x4" => Some(UniformKind::Mat4),
        "sampler2D" | "texture" => Some(UniformKind::Texture),
        _ => None,
    }
}
