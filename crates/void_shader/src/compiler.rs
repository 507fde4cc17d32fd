//! WGSL front end
//!
//! Parses and validates program source with naga. Only the module is kept;
//! backend code generation happens in the renderer.

use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::ShaderError;

/// Parses and validates WGSL
pub struct WgslFrontend {
    flags: ValidationFlags,
    capabilities: Capabilities,
}

impl WgslFrontend {
    /// Create a front end with full validation
    pub fn new() -> Self {
        Self {
            flags: ValidationFlags::all(),
            capabilities: Capabilities::all(),
        }
    }

    /// Create a front end that skips validation
    pub fn unvalidated() -> Self {
        Self {
            flags: ValidationFlags::empty(),
            capabilities: Capabilities::all(),
        }
    }

    /// Parse WGSL source into a naga module
    pub fn parse(&self, source: &str) -> Result<naga::Module, ShaderError> {
        wgsl::parse_str(source).map_err(|e| ShaderError::ParseError(format!("{:?}", e)))
    }

    /// Parse and validate
    pub fn load(&self, source: &str) -> Result<naga::Module, ShaderError> {
        let module = self.parse(source)?;
        if !self.flags.is_empty() {
            Validator::new(self.flags, self.capabilities)
                .validate(&module)
                .map_err(|e| ShaderError::ValidationError(format!("{:?}", e)))?;
        }
        Ok(module)
    }
}

impl Default for WgslFrontend {
    fn default() -> Self {
        Self::new()
    }
}
