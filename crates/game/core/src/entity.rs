//! Generation-checked entity handles.
//!
//! A handle is the identity of a turn-taking entity. Two handles are equal only
//! if they refer to the same allocation: freeing a slot bumps its generation,
//! so a handle kept after removal never matches the entity that reuses the slot.

use std::fmt;

/// Opaque identity of an entity participating in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityHandle {
    index: u32,
    generation: u32,
}

impl EntityHandle {
    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Slot allocator handing out [`EntityHandle`]s.
#[derive(Clone, Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh handle, reusing a freed slot when one is available.
    pub fn allocate(&mut self) -> EntityHandle {
        if let Some(index) = self.free.pop() {
            let slot = index as usize;
            self.alive[slot] = true;
            return EntityHandle {
                index,
                generation: self.generations[slot],
            };
        }

        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.alive.push(true);
        EntityHandle {
            index,
            generation: 0,
        }
    }

    /// Releases `handle`. Returns false if it was already stale.
    pub fn free(&mut self, handle: EntityHandle) -> bool {
        if !self.is_alive(handle) {
            return false;
        }

        let slot = handle.index as usize;
        self.alive[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push(handle.index);
        true
    }

    pub fn is_alive(&self, handle: EntityHandle) -> bool {
        let slot = handle.index as usize;
        self.alive.get(slot).copied().unwrap_or(false)
            && self.generations[slot] == handle.generation
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frees every slot. Handles issued before the clear become stale.
    pub fn clear(&mut self) {
        for slot in 0..self.generations.len() {
            if self.alive[slot] {
                self.alive[slot] = false;
                self.generations[slot] = self.generations[slot].wrapping_add(1);
                self.free.push(slot as u32);
            }
        }
    }
}
