//! Uniform reflection
//!
//! Flattens a naga module's uniform blocks into named, typed declarations.
//!
//! - `var<uniform> light0: LightBlock` exposes each member as
//!   `light0.<member>` at the member's offset.
//! - A non-struct `var<uniform> exposure: f32` is exposed as `exposure`.
//! - Texture globals are exposed by name with a double underscore read as the
//!   block separator, so `light0__shadow_map` becomes `light0.shadow_map`.
//!
//! Uniform blocks are packed one after another into a single CPU-side block,
//! each starting on a 16-byte boundary. Members of unsupported types still
//! occupy their space but are not exposed.

use crate::uniform::{UniformDecl, UniformKind};

/// Separator written as `__` in WGSL identifiers
const BLOCK_SEPARATOR: &str = "__";

/// Reflected uniform interface of a module
#[derive(Debug, Clone, Default)]
pub struct UniformReflection {
    /// Declarations in module order
    pub uniforms: Vec<UniformDecl>,
    /// Total size of the packed block in bytes
    pub block_size: u32,
}

/// Reflect a naga module's uniforms
pub fn reflect_uniforms(module: &naga::Module) -> UniformReflection {
    let mut reflection = UniformReflection::default();

    for (_, gv) in module.global_variables.iter() {
        let Some(name) = gv.name.as_deref() else {
            continue;
        };
        let ty = &module.types[gv.ty];

        match gv.space {
            naga::AddressSpace::Uniform => {
                let base = align_to(reflection.block_size, 16);
                match &ty.inner {
                    naga::TypeInner::Struct { members, span } => {
                        for member in members {
                            let inner = &module.types[member.ty].inner;
                            if let (Some(member_name), Some(kind)) =
                                (member.name.as_deref(), uniform_kind(inner))
                            {
                                reflection.uniforms.push(UniformDecl::new(
                                    format!("{}.{}", name, member_name),
                                    kind,
                                    base + member.offset,
                                ));
                            }
                        }
                        reflection.block_size = base + span;
                    }
                    inner => {
                        if let Some(kind) = uniform_kind(inner) {
                            reflection.uniforms.push(UniformDecl::new(name, kind, base));
                            reflection.block_size = base + kind.size();
                        }
                    }
                }
            }
            naga::AddressSpace::Handle => {
                if matches!(ty.inner, naga::TypeInner::Image { .. }) {
                    reflection.uniforms.push(UniformDecl::new(
                        name.replacen(BLOCK_SEPARATOR, ".", 1),
                        UniformKind::Texture,
                        0,
                    ));
                }
            }
            _ => {}
        }
    }

    reflection
}

/// Map a naga type to a supported uniform kind
fn uniform_kind(inner: &naga::TypeInner) -> Option<UniformKind> {
    match inner {
        naga::TypeInner::Scalar {
            kind: naga::ScalarKind::Float,
            width: 4,
        } => Some(UniformKind::Float),
        naga::TypeInner::Vector {
            size,
            kind: naga::ScalarKind::Float,
            width: 4,
        } => match size {
            naga::VectorSize::Tri => Some(UniformKind::Vec3),
            naga::VectorSize::Quad => Some(UniformKind::Vec4),
            naga::VectorSize::Bi => None,
        },
        naga::TypeInner::Matrix {
            columns: naga::VectorSize::Quad,
            rows: naga::VectorSize::Quad,
            width: 4,
        } => Some(UniformKind::Mat4),
        _ => None,
    }
}

/// Round `offset` up to a multiple of `align`
pub(crate) fn align_to(offset: u32, align: u32) -> u32 {
    offset.div_ceil(align) * align
}
