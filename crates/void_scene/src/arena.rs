//! Arena - Generational index storage for nodes and components
//!
//! O(1) insertion, removal and lookup with stale-key detection. A slot can
//! also be *vacated* (`take`) without being freed: its key stays reserved
//! until the value is put back with `restore` or the slot is removed.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// Key into an [`Arena`], tagged with the stored type
pub struct ArenaKey<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArenaKey<T> {
    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Slot index
    #[inline]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the key was issued
    #[inline]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

// Manual impls: derives would put bounds on `T`.
impl<T> Clone for ArenaKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaKey<T> {}

impl<T> PartialEq for ArenaKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for ArenaKey<T> {}

impl<T> PartialOrd for ArenaKey<T> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ArenaKey<T> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        (self.index, self.generation).cmp(&(other.index, other.generation))
    }
}

impl<T> Hash for ArenaKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for ArenaKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArenaKey({}v{})", self.index, self.generation)
    }
}

enum SlotState<T> {
    Vacant,
    Occupied(T),
    /// Value temporarily moved out; the key is still live.
    Reserved,
}

struct Slot<T> {
    state: SlotState<T>,
    generation: u32,
}

/// Generational arena
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    len: usize,
}

impl<T> Arena<T> {
    /// Create an empty arena
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Insert a value and return its key
    pub fn insert(&mut self, value: T) -> ArenaKey<T> {
        self.len += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.state = SlotState::Occupied(value);
            ArenaKey::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                state: SlotState::Occupied(value),
                generation: 0,
            });
            ArenaKey::new(index, 0)
        }
    }

    /// Free a slot. Returns the value if the slot was occupied; a reserved
    /// slot is freed as well but yields `None`.
    pub fn remove(&mut self, key: ArenaKey<T>) -> Option<T> {
        let slot = self.live_slot_mut(key)?;
        let state = core::mem::replace(&mut slot.state, SlotState::Vacant);
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(key.index);
        self.len -= 1;

        match state {
            SlotState::Occupied(value) => Some(value),
            _ => None,
        }
    }

    /// Move a value out while keeping its key reserved
    pub fn take(&mut self, key: ArenaKey<T>) -> Option<T> {
        let slot = self.live_slot_mut(key)?;
        match core::mem::replace(&mut slot.state, SlotState::Reserved) {
            SlotState::Occupied(value) => Some(value),
            other => {
                slot.state = other;
                None
            }
        }
    }

    /// Put a value back into a reserved slot. Hands the value back if the key
    /// is stale or the slot was not reserved.
    pub fn restore(&mut self, key: ArenaKey<T>, value: T) -> Result<(), T> {
        match self.live_slot_mut(key) {
            Some(slot) if matches!(slot.state, SlotState::Reserved) => {
                slot.state = SlotState::Occupied(value);
                Ok(())
            }
            _ => Err(value),
        }
    }

    /// Get a reference to a value
    pub fn get(&self, key: ArenaKey<T>) -> Option<&T> {
        let slot = self.slots.get(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        match &slot.state {
            SlotState::Occupied(value) => Some(value),
            _ => None,
        }
    }

    /// Get a mutable reference to a value
    pub fn get_mut(&mut self, key: ArenaKey<T>) -> Option<&mut T> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        match &mut slot.state {
            SlotState::Occupied(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the key refers to a live slot (occupied or reserved)
    pub fn contains_key(&self, key: ArenaKey<T>) -> bool {
        self.slots
            .get(key.index as usize)
            .map(|s| s.generation == key.generation && !matches!(s.state, SlotState::Vacant))
            .unwrap_or(false)
    }

    /// Whether the key's value is currently moved out
    pub fn is_reserved(&self, key: ArenaKey<T>) -> bool {
        self.slots
            .get(key.index as usize)
            .map(|s| s.generation == key.generation && matches!(s.state, SlotState::Reserved))
            .unwrap_or(false)
    }

    /// Number of live slots, reserved ones included
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over occupied slots
    pub fn iter(&self) -> impl Iterator<Item = (ArenaKey<T>, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match &slot.state {
            SlotState::Occupied(value) => Some((ArenaKey::new(i as u32, slot.generation), value)),
            _ => None,
        })
    }

    /// Iterate over occupied slots mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ArenaKey<T>, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            match &mut slot.state {
                SlotState::Occupied(value) => Some((ArenaKey::new(i as u32, generation), value)),
                _ => None,
            }
        })
    }

    fn live_slot_mut(&mut self, key: ArenaKey<T>) -> Option<&mut Slot<T>> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation || matches!(slot.state, SlotState::Vacant) {
            return None;
        }
        Some(slot)
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
