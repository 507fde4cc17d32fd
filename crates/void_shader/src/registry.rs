//! Program registry
//!
//! Keeps every linked program's uniform interface and its CPU-side uniform
//! block, and answers location lookups for the things that feed programs.
//! Lookups are cached per `(program, name)`, misses included, so a light that
//! asks for a uniform the program does not declare pays for the search once.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::compiler::WgslFrontend;
use crate::descriptor::parse_descriptor;
use crate::reflect::{reflect_uniforms, UniformReflection};
use crate::uniform::{ProgramId, UniformDecl, UniformKind, UniformLocation, UniformValue};
use crate::{ProgramManager, ShaderError};

/// A registered program
#[derive(Debug, Clone)]
pub struct ProgramEntry {
    /// Program name
    pub name: String,
    /// Declared uniforms; a uniform's location is its index here
    pub uniforms: Vec<UniformDecl>,
    /// Packed uniform block
    block: Vec<u8>,
    /// Last uploaded value per location
    values: HashMap<UniformLocation, UniformValue>,
    /// Number of uploads accepted
    upload_count: u64,
}

impl ProgramEntry {
    fn new(name: String, reflection: UniformReflection) -> Self {
        Self {
            name,
            uniforms: reflection.uniforms,
            block: vec![0; reflection.block_size as usize],
            values: HashMap::new(),
            upload_count: 0,
        }
    }

    fn find(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms
            .iter()
            .position(|u| u.name == name)
            .map(|i| UniformLocation::new(i as u32))
    }
}

/// Location cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to search the program
    pub misses: u64,
}

/// Registry of linked programs
pub struct ProgramRegistry {
    next_id: AtomicU32,
    programs: HashMap<ProgramId, ProgramEntry>,
    name_to_id: HashMap<String, ProgramId>,
    location_cache: RwLock<HashMap<(ProgramId, String), Option<UniformLocation>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    frontend: WgslFrontend,
}

impl ProgramRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::with_frontend(WgslFrontend::new())
    }

    /// Create an empty registry with a custom WGSL front end
    pub fn with_frontend(frontend: WgslFrontend) -> Self {
        Self {
            next_id: AtomicU32::new(1),
            programs: HashMap::new(),
            name_to_id: HashMap::new(),
            location_cache: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            frontend,
        }
    }

    /// Register a program from WGSL source
    pub fn register_wgsl(&mut self, name: &str, source: &str) -> Result<ProgramId, ShaderError> {
        let module = self.frontend.load(source)?;
        let reflection = reflect_uniforms(&module);
        self.insert(name, reflection)
    }

    /// Register a program from a WGSL file; the program is named after the file stem
    pub fn load_wgsl(&mut self, path: impl AsRef<Path>) -> Result<ProgramId, ShaderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
            .to_string();
        self.register_wgsl(&name, &source)
    }

    /// Register a program from a uniform descriptor
    pub fn register_descriptor(
        &mut self,
        name: &str,
        descriptor: &str,
    ) -> Result<ProgramId, ShaderError> {
        let reflection = parse_descriptor(descriptor)?;
        self.insert(name, reflection)
    }

    fn insert(&mut self, name: &str, reflection: UniformReflection) -> Result<ProgramId, ShaderError> {
        if self.name_to_id.contains_key(name) {
            return Err(ShaderError::AlreadyRegistered(name.to_string()));
        }

        let id = ProgramId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        log::debug!(
            "Registered program '{}' -> {:?} ({} uniforms, {} byte block)",
            name,
            id,
            reflection.uniforms.len(),
            reflection.block_size
        );
        self.programs.insert(id, ProgramEntry::new(name.to_string(), reflection));
        self.name_to_id.insert(name.to_string(), id);
        Ok(id)
    }

    /// Remove a program and forget its cached locations
    pub fn remove(&mut self, id: ProgramId) -> Option<ProgramEntry> {
        let entry = self.programs.remove(&id)?;
        self.name_to_id.remove(&entry.name);
        self.location_cache.write().retain(|(program, _), _| *program != id);
        Some(entry)
    }

    /// Get a program
    pub fn get(&self, id: ProgramId) -> Option<&ProgramEntry> {
        self.programs.get(&id)
    }

    /// Find a program by name
    pub fn program_by_name(&self, name: &str) -> Option<ProgramId> {
        self.name_to_id.get(name).copied()
    }

    /// Last value uploaded to a named uniform
    pub fn uniform_value(&self, id: ProgramId, name: &str) -> Option<UniformValue> {
        let entry = self.programs.get(&id)?;
        let location = entry.find(name)?;
        entry.values.get(&location).copied()
    }

    /// The packed uniform block, ready for a buffer write
    pub fn block_bytes(&self, id: ProgramId) -> Option<&[u8]> {
        self.programs.get(&id).map(|e| e.block.as_slice())
    }

    /// Number of uploads a program has accepted
    pub fn upload_count(&self, id: ProgramId) -> u64 {
        self.programs.get(&id).map(|e| e.upload_count).unwrap_or(0)
    }

    /// Location cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of registered programs
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// All registered program IDs
    pub fn ids(&self) -> Vec<ProgramId> {
        self.programs.keys().copied().collect()
    }
}

impl Default for ProgramRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramManager for ProgramRegistry {
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        if let Some(cached) = self.location_cache.read().get(&(program, name.to_string())) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return *cached;
        }

        // Unknown programs are not cached so a later registration is seen
        let entry = self.programs.get(&program)?;
        let location = entry.find(name);
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.location_cache
            .write()
            .insert((program, name.to_string()), location);
        location
    }

    fn upload(
        &mut self,
        program: ProgramId,
        location: UniformLocation,
        value: UniformValue,
    ) -> Result<(), ShaderError> {
        let entry = self
            .programs
            .get_mut(&program)
            .ok_or(ShaderError::NotFound(program))?;
        let decl = entry
            .uniforms
            .get(location.raw() as usize)
            .ok_or(ShaderError::InvalidLocation { program, location })?;

        if decl.kind != value.kind() {
            return Err(ShaderError::KindMismatch {
                name: decl.name.clone(),
                expected: decl.kind,
                found: value.kind(),
            });
        }

        if decl.kind != UniformKind::Texture {
            let start = decl.offset as usize;
            let bytes = value.to_bytes();
            if let Some(dst) = entry.block.get_mut(start..start + bytes.len()) {
                dst.copy_from_slice(&bytes);
            }
        }

        entry.values.insert(location, value);
        entry.upload_count += 1;
        Ok(())
    }
}
