//! Shadow Slot Table
//!
//! Tracks which lights hold one of the renderer's shadow-map slots. A slot is
//! an index the renderer turns into a texture unit when it binds the light's
//! depth texture; the table never creates GPU resources itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Renderer-wide shadow-map slot allocation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShadowSlotTable {
    /// Number of slots
    capacity: u32,

    /// Active allocations (light ID -> slot)
    allocations: BTreeMap<String, u32>,

    /// Free slots (stack, lowest index on top)
    free_slots: Vec<u32>,

    /// Statistics
    stats: SlotStats,
}

impl ShadowSlotTable {
    /// Create a table with `capacity` slots
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            allocations: BTreeMap::new(),
            free_slots: (0..capacity).rev().collect(),
            stats: SlotStats::default(),
        }
    }

    /// Begin a new frame, resetting the per-frame counters
    pub fn begin_frame(&mut self) {
        self.stats.allocations_this_frame = 0;
        self.stats.releases_this_frame = 0;
    }

    /// Allocate a slot for a light
    ///
    /// Returns None if every slot is taken. A light that already holds a
    /// slot keeps it.
    pub fn allocate(&mut self, light_id: &str) -> Option<u32> {
        if let Some(&slot) = self.allocations.get(light_id) {
            return Some(slot);
        }

        let slot = self.free_slots.pop()?;
        self.allocations.insert(light_id.to_string(), slot);
        self.stats.allocations_this_frame += 1;
        self.stats.total_allocations += 1;

        Some(slot)
    }

    /// Release a light's slot
    pub fn release(&mut self, light_id: &str) -> bool {
        match self.allocations.remove(light_id) {
            Some(slot) => {
                self.free_slots.push(slot);
                self.stats.releases_this_frame += 1;
                true
            }
            None => false,
        }
    }

    /// Slot held by a light
    pub fn slot_of(&self, light_id: &str) -> Option<u32> {
        self.allocations.get(light_id).copied()
    }

    /// Check if a light holds a slot
    pub fn contains(&self, light_id: &str) -> bool {
        self.allocations.contains_key(light_id)
    }

    /// Number of slots
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of allocated slots
    pub fn allocated_count(&self) -> usize {
        self.allocations.len()
    }

    /// Number of free slots
    pub fn free_count(&self) -> usize {
        self.free_slots.len()
    }

    /// Statistics
    pub fn stats(&self) -> &SlotStats {
        &self.stats
    }
}

impl Default for ShadowSlotTable {
    fn default() -> Self {
        Self::new(8)
    }
}

/// Slot table statistics
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStats {
    /// Allocations made this frame
    pub allocations_this_frame: u32,

    /// Releases made this frame
    pub releases_this_frame: u32,

    /// Total allocations ever made
    pub total_allocations: u64,
}
