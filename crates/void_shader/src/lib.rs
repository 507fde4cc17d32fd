//! # Void Shader
//!
//! Program side of the renderer's uniform plumbing:
//! - WGSL parsing and validation via naga
//! - Uniform reflection into named, typed declarations
//! - Compact uniform descriptors for programs not authored in WGSL
//! - A program registry with cached location lookups and CPU uniform blocks
//!
//! ## Architecture
//!
//! ```text
//! Source (.wgsl) ──► WgslFrontend ──► naga::Module ──► reflect_uniforms ──┐
//!                                                                         ├──► ProgramRegistry
//! Descriptor ────────────────────────► parse_descriptor ──────────────────┘        │
//!                                                                                  ▼
//!                                                   uniform_location / upload (ProgramManager)
//! ```

pub mod compiler;
pub mod descriptor;
pub mod reflect;
pub mod registry;
pub mod uniform;

pub use compiler::WgslFrontend;
pub use descriptor::parse_descriptor;
pub use reflect::{reflect_uniforms, UniformReflection};
pub use registry::{CacheStats, ProgramEntry, ProgramRegistry};
pub use uniform::{
    ProgramId, TextureHandle, UniformDecl, UniformKind, UniformLocation, UniformValue,
};

use thiserror::Error;

/// Errors from the shader crate
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Failed to read shader file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("WGSL parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Descriptor error: {0}")]
    Descriptor(String),

    #[error("Program not found: {0:?}")]
    NotFound(ProgramId),

    #[error("Program already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Invalid uniform location {location:?} for {program:?}")]
    InvalidLocation {
        program: ProgramId,
        location: UniformLocation,
    },

    #[error("Uniform '{name}' expects {expected:?}, got {found:?}")]
    KindMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
}

/// Resolves uniform names and accepts uploads for linked programs.
///
/// Anything that feeds values into programs talks to this trait rather than
/// to a concrete registry, so tests and alternate backends can stand in.
pub trait ProgramManager {
    /// Location of a named uniform in a program, if the program declares it
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Upload a value to a location
    fn upload(
        &mut self,
        program: ProgramId,
        location: UniformLocation,
        value: UniformValue,
    ) -> Result<(), ShaderError>;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ProgramId, ProgramManager, ProgramRegistry, ShaderError, TextureHandle, UniformKind,
        UniformLocation, UniformValue,
    };
}
