//! Integration tests for the program registry
//!
//! Covers the path a lighting pass takes through the crate:
//! - Registration from WGSL and from descriptors
//! - Location lookups by qualified name
//! - Uploads landing in the packed block

use glam::{Mat4, Vec3, Vec4};
use void_shader::{
    ProgramManager, ProgramRegistry, ShaderError, TextureHandle, UniformKind, UniformValue,
};

const LIT_SHADER: &str = r#"
    struct SpotLight {
        world_position: vec3<f32>,
        attenuation_constant: f32,
        world_direction: vec3<f32>,
        inner_cone_angle: f32,
        diffuse_intensity: vec4<f32>,
        sm0: mat4x4<f32>,
    }

    @group(0) @binding(0)
    var<uniform> spot0: SpotLight;

    @group(0) @binding(1)
    var spot0__shadow_map: texture_depth_2d;

    @group(0) @binding(2)
    var shadow_sampler: sampler_comparison;

    @fragment
    fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
        let lit = textureSampleCompare(spot0__shadow_map, shadow_sampler, uv, 0.5);
        return spot0.diffuse_intensity * lit * spot0.attenuation_constant;
    }
"#;

#[test]
fn test_wgsl_program_round_trip() {
    let mut registry = ProgramRegistry::new();
    let program = registry.register_wgsl("lit", LIT_SHADER).expect("Should register");

    let position = registry
        .uniform_location(program, "spot0.world_position")
        .expect("Should declare position");
    let angle = registry
        .uniform_location(program, "spot0.inner_cone_angle")
        .expect("Should declare cone angle");
    let matrix = registry
        .uniform_location(program, "spot0.sm0")
        .expect("Should declare shadow matrix");
    let shadow = registry
        .uniform_location(program, "spot0.shadow_map")
        .expect("Should declare shadow texture");

    registry
        .upload(program, position, UniformValue::Vec3(Vec3::new(0.0, 4.0, 0.0)))
        .unwrap();
    registry
        .upload(program, angle, UniformValue::Float(0.5))
        .unwrap();
    registry
        .upload(program, matrix, UniformValue::Mat4(Mat4::IDENTITY))
        .unwrap();
    registry
        .upload(
            program,
            shadow,
            UniformValue::Texture {
                unit: 4,
                texture: TextureHandle::new(7),
            },
        )
        .unwrap();

    assert_eq!(registry.upload_count(program), 4);
    assert_eq!(
        registry.uniform_value(program, "spot0.inner_cone_angle"),
        Some(UniformValue::Float(0.5))
    );

    // world_direction follows attenuation_constant at 16, cone angle packs after it
    let block = registry.block_bytes(program).unwrap();
    let angle_value: f32 = bytemuck::pod_read_unaligned(&block[28..32]);
    assert_eq!(angle_value, 0.5);
}

#[test]
fn test_descriptor_and_wgsl_agree_on_layout() {
    let mut registry = ProgramRegistry::new();
    let from_wgsl = registry.register_wgsl("lit", LIT_SHADER).unwrap();
    let from_descriptor = registry
        .register_descriptor(
            "lit_desc",
            "float3 spot0.world_position float spot0.attenuation_constant \
             float3 spot0.world_direction float spot0.inner_cone_angle \
             float4 spot0.diffuse_intensity mat4 spot0.sm0 sampler2D spot0.shadow_map",
        )
        .unwrap();

    let wgsl = registry.get(from_wgsl).unwrap().uniforms.clone();
    let desc = registry.get(from_descriptor).unwrap().uniforms.clone();
    assert_eq!(wgsl, desc);
    assert_eq!(
        registry.block_bytes(from_wgsl).unwrap().len(),
        registry.block_bytes(from_descriptor).unwrap().len()
    );
}

#[test]
fn test_rejects_mismatched_upload() {
    let mut registry = ProgramRegistry::new();
    let program = registry.register_wgsl("lit", LIT_SHADER).unwrap();
    let color = registry
        .uniform_location(program, "spot0.diffuse_intensity")
        .unwrap();

    match registry.upload(program, color, UniformValue::Float(1.0)) {
        Err(ShaderError::KindMismatch {
            expected, found, ..
        }) => {
            assert_eq!(expected, UniformKind::Vec4);
            assert_eq!(found, UniformKind::Float);
        }
        other => panic!("expected kind mismatch, got {:?}", other),
    }

    registry
        .upload(program, color, UniformValue::Vec4(Vec4::new(1.0, 0.9, 0.8, 1.0)))
        .unwrap();
    assert_eq!(registry.upload_count(program), 1);
}

#[test]
fn test_invalid_wgsl_is_not_registered() {
    let mut registry = ProgramRegistry::new();
    assert!(registry.register_wgsl("broken", "fn {").is_err());
    assert!(registry.program_by_name("broken").is_none());
    assert!(registry.is_empty());
}
