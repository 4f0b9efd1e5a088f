//! # Slot Allocator
//!
//! Growable, generational allocator handing out compact integer slots.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A slot allocator over a dense array of `T` records.
///
/// Slots are plain `u32` indices into the record array. A slot is either
/// *free* (on the free list) or *bound*. Every release bumps the slot's
/// generation so callers can detect stale `(slot, generation)` pairs.
///
/// # Reuse order
///
/// `allocate` always returns the lowest free slot. When nothing below the
/// high-water mark is free, the array grows by doubling.
///
/// # Thread Safety
///
/// This allocator is NOT thread-safe. The bridge owns it and is externally
/// synchronized.
///
/// # Example
///
/// ```rust,ignore
/// let mut slots: SlotAllocator<EntityRecord> = SlotAllocator::with_capacity(4);
///
/// let (a, _) = slots.allocate(); // 0
/// let (b, _) = slots.allocate(); // 1
/// slots.release(a);
/// let (c, _) = slots.allocate(); // 0 again, generation bumped
/// ```
pub struct SlotAllocator<T> {
    /// Dense record storage, one entry per slot below the high-water mark.
    records: Vec<T>,
    /// Whether each slot is currently bound.
    bound: Vec<bool>,
    /// Generation counter per slot, bumped on release.
    generations: Vec<u32>,
    /// Min-ordered free list of released slots.
    free: BinaryHeap<Reverse<u32>>,
    /// Number of bound slots.
    bound_count: usize,
}

impl<T: Default> SlotAllocator<T> {
    /// Creates an allocator with room for `capacity` slots before the first growth.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            bound: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free: BinaryHeap::new(),
            bound_count: 0,
        }
    }

    /// Number of bound slots.
    #[inline]
    #[must_use]
    pub const fn bound_count(&self) -> usize {
        self.bound_count
    }

    /// Number of released slots waiting for reuse.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// One past the highest slot ever handed out.
    #[inline]
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.records.len()
    }

    /// Slots the backing array can hold before it grows again.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    /// Allocates the lowest free slot, growing the array if needed.
    ///
    /// Returns the slot and its current generation.
    ///
    /// # Panics
    ///
    /// Panics if the `u32` slot space is exhausted.
    pub fn allocate(&mut self) -> (u32, u32) {
        if let Some(Reverse(slot)) = self.free.pop() {
            let idx = slot as usize;
            self.bound[idx] = true;
            self.bound_count += 1;
            return (slot, self.generations[idx]);
        }

        let len = self.records.len();
        assert!(len < u32::MAX as usize, "slot index space exhausted");

        if len == self.records.capacity() {
            let grow_by = len.max(1);
            self.records.reserve_exact(grow_by);
            self.bound.reserve_exact(grow_by);
            self.generations.reserve_exact(grow_by);
        }

        self.records.push(T::default());
        self.bound.push(true);
        self.generations.push(0);
        self.bound_count += 1;

        #[allow(clippy::cast_possible_truncation)]
        (len as u32, 0)
    }

    /// Releases a slot back to the free list and resets its record.
    ///
    /// The caller is responsible for ownership checks. Returns `false` if the
    /// slot is out of range or already free.
    pub fn release(&mut self, slot: u32) -> bool {
        let idx = slot as usize;
        if idx >= self.records.len() {
            return false;
        }
        debug_assert!(self.bound[idx], "double release of slot {slot}");
        if !self.bound[idx] {
            return false;
        }

        self.records[idx] = T::default();
        self.bound[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free.push(Reverse(slot));
        self.bound_count -= 1;
        true
    }

    /// Slot the next [`SlotAllocator::allocate`] will return.
    #[must_use]
    pub fn next_free(&self) -> u32 {
        self.free
            .peek()
            .map_or_else(|| idx_to_slot(self.records.len()), |Reverse(slot)| *slot)
    }

    /// Whether `slot` is currently bound.
    #[inline]
    #[must_use]
    pub fn is_bound(&self, slot: u32) -> bool {
        self.bound.get(slot as usize).copied().unwrap_or(false)
    }

    /// Current generation of `slot`, or `None` if out of range.
    #[inline]
    #[must_use]
    pub fn generation(&self, slot: u32) -> Option<u32> {
        self.generations.get(slot as usize).copied()
    }

    /// Whether `(slot, generation)` names the current binding of a bound slot.
    #[inline]
    #[must_use]
    pub fn is_current(&self, slot: u32, generation: u32) -> bool {
        self.is_bound(slot) && self.generation(slot) == Some(generation)
    }

    /// Record of a bound slot.
    #[inline]
    #[must_use]
    pub fn get(&self, slot: u32) -> Option<&T> {
        if self.is_bound(slot) {
            self.records.get(slot as usize)
        } else {
            None
        }
    }

    /// Mutable record of a bound slot.
    #[inline]
    pub fn get_mut(&mut self, slot: u32) -> Option<&mut T> {
        if self.is_bound(slot) {
            self.records.get_mut(slot as usize)
        } else {
            None
        }
    }

    /// Iterates bound slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.records
            .iter()
            .zip(self.bound.iter())
            .enumerate()
            .filter(|(_, (_, bound))| **bound)
            .map(|(idx, (record, _))| (idx_to_slot(idx), record))
    }

    /// Iterates bound slots mutably in ascending order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> {
        self.records
            .iter_mut()
            .zip(self.bound.iter())
            .enumerate()
            .filter(|(_, (_, bound))| **bound)
            .map(|(idx, (record, _))| (idx_to_slot(idx), record))
    }

    /// Bound slot indices in ascending order.
    #[must_use]
    pub fn bound_slots(&self) -> Vec<u32> {
        self.iter().map(|(slot, _)| slot).collect()
    }

    /// Releases every slot. Generations of bound slots are bumped.
    pub fn clear(&mut self) {
        for slot in 0..self.records.len() {
            if self.bound[slot] {
                self.release(idx_to_slot(slot));
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
#[inline]
fn idx_to_slot(idx: usize) -> u32 {
    idx as u32
}
