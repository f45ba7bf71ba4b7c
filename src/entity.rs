//! Generational storage for simulated units.
//!
//! Units refer to one another (aim, focus, follow) through [`UnitHandle`]s:
//! a slot index plus the generation the slot had when the handle was issued.
//! Destroying a unit bumps the slot generation, so every outstanding handle
//! silently stops resolving instead of aliasing whatever reuses the slot.

use serde::{Deserialize, Serialize};

/// Weak reference to a unit stored in an [`Arena`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UnitHandle {
    index: u32,
    generation: u32,
}

impl UnitHandle {
    /// Builds a handle from raw parts.
    ///
    /// Intended for replays and tests; handles produced this way only resolve
    /// if the arena slot currently carries the same generation.
    #[must_use]
    pub const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index; also the fixed iteration key for shared-victim writes.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at the time the handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot arena keyed by [`UnitHandle`].
///
/// Iteration is always in ascending slot order, which the simulation relies
/// on for reproducible scans.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, reusing the most recently freed slot if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use skirmish::entity::Arena;
    /// let mut arena = Arena::new();
    /// let first = arena.insert("a");
    /// arena.remove(first);
    /// let second = arena.insert("b");
    /// assert_eq!(first.index(), second.index());
    /// assert!(arena.get(first).is_none());
    /// assert_eq!(arena.get(second), Some(&"b"));
    /// ```
    pub fn insert(&mut self, value: T) -> UnitHandle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.value = Some(value);
                return UnitHandle::from_raw_parts(index, slot.generation);
            }
        }
        let index = crate::numeric::saturating_u32(self.slots.len());
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        UnitHandle::from_raw_parts(index, 0)
    }

    /// Removes the value behind `handle`, invalidating every copy of it.
    pub fn remove(&mut self, handle: UnitHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(value)
    }

    /// Resolves `handle`, returning `None` for stale or unknown handles.
    #[must_use]
    pub fn get(&self, handle: UnitHandle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Mutable variant of [`Arena::get`].
    pub fn get_mut(&mut self, handle: UnitHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Whether `handle` still resolves.
    #[must_use]
    pub fn contains(&self, handle: UnitHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Whether the arena holds no live values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Handles of all live values in slot order.
    #[must_use]
    pub fn handles(&self) -> Vec<UnitHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    /// Iterates live values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    UnitHandle::from_raw_parts(
                        crate::numeric::saturating_u32(index),
                        slot.generation,
                    ),
                    value,
                )
            })
        })
    }

    /// Iterates live values mutably in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (UnitHandle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                let generation = slot.generation;
                slot.value.as_mut().map(|value| {
                    (
                        UnitHandle::from_raw_parts(
                            crate::numeric::saturating_u32(index),
                            generation,
                        ),
                        value,
                    )
                })
            })
    }
}
