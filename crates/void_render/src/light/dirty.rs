//! Per-program dirty tracking
//!
//! One flag per program that has asked for this light's uniforms. A program
//! seen for the first time starts dirty so it always gets an initial sync.

use std::collections::HashMap;

use void_shader::ProgramId;

/// Which programs hold stale copies of a light's uniforms
#[derive(Clone, Debug, Default)]
pub struct DirtyTracker {
    flags: HashMap<ProgramId, bool>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every tracked program stale
    pub fn mark_all_dirty(&mut self) {
        for flag in self.flags.values_mut() {
            *flag = true;
        }
    }

    /// Check a program, registering it as dirty if unseen
    pub fn is_dirty(&mut self, program: ProgramId) -> bool {
        *self.flags.entry(program).or_insert(true)
    }

    /// Check a program without registering it
    pub fn peek(&self, program: ProgramId) -> bool {
        self.flags.get(&program).copied().unwrap_or(true)
    }

    /// Mark a program in sync
    pub fn clear(&mut self, program: ProgramId) {
        self.flags.insert(program, false);
    }

    /// Check if a program has been seen
    pub fn is_tracked(&self, program: ProgramId) -> bool {
        self.flags.contains_key(&program)
    }

    /// Number of tracked programs
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
