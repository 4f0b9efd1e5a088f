//! # Flag Table
//!
//! One atomic flag word per slot, shared between the simulation writer and
//! any number of readers.

use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::RwLock;

use crate::ecs::EntityFlags;

/// Atomic per-slot flag words.
///
/// ## Thread Safety
///
/// - Readers (`get_flags`, `has_flag`) take a shared lock and an `Acquire` load.
/// - Writers store with `Release`; single-bit updates use `fetch_or`/`fetch_and`.
/// - `ensure_len` takes the exclusive lock; it only runs when the slot
///   allocator grows, which is never during a step.
///
/// `update` is a plain load-modify-store and is only correct with a single
/// writer per slot, which the bridge guarantees.
pub struct FlagTable {
    /// Flag word per slot.
    words: RwLock<Vec<AtomicU32>>,
}

impl FlagTable {
    /// Creates a table with `len` zeroed words.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            words: RwLock::new((0..len).map(|_| AtomicU32::new(0)).collect()),
        }
    }

    /// Number of words.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.read().len()
    }

    /// Whether the table has no words.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grows the table to at least `len` words, new words zeroed.
    pub fn ensure_len(&self, len: usize) {
        if self.words.read().len() >= len {
            return;
        }
        let mut words = self.words.write();
        while words.len() < len {
            words.push(AtomicU32::new(0));
        }
    }

    /// Flags of `slot`; empty if the slot is out of range.
    #[inline]
    #[must_use]
    pub fn get_flags(&self, slot: u32) -> EntityFlags {
        self.words
            .read()
            .get(slot as usize)
            .map_or(EntityFlags::EMPTY, |w| EntityFlags::from_bits(w.load(Ordering::Acquire)))
    }

    /// Overwrites the flags of `slot`. Returns `false` if out of range.
    #[inline]
    pub fn set_flags(&self, slot: u32, flags: EntityFlags) -> bool {
        match self.words.read().get(slot as usize) {
            Some(word) => {
                word.store(flags.bits(), Ordering::Release);
                true
            }
            None => false,
        }
    }

    /// Sets `flag` on `slot`, returning the previous flags.
    #[inline]
    pub fn set_flag(&self, slot: u32, flag: u32) -> EntityFlags {
        self.words
            .read()
            .get(slot as usize)
            .map_or(EntityFlags::EMPTY, |w| {
                EntityFlags::from_bits(w.fetch_or(flag, Ordering::AcqRel))
            })
    }

    /// Clears `flag` on `slot`, returning the previous flags.
    #[inline]
    pub fn clear_flag(&self, slot: u32, flag: u32) -> EntityFlags {
        self.words
            .read()
            .get(slot as usize)
            .map_or(EntityFlags::EMPTY, |w| {
                EntityFlags::from_bits(w.fetch_and(!flag, Ordering::AcqRel))
            })
    }

    /// Whether every bit of `flag` is set on `slot`.
    #[inline]
    #[must_use]
    pub fn has_flag(&self, slot: u32, flag: u32) -> bool {
        self.get_flags(slot).contains(flag)
    }

    /// Single-writer read-modify-write. Returns the new flags.
    pub fn update(&self, slot: u32, f: impl FnOnce(EntityFlags) -> EntityFlags) -> EntityFlags {
        let words = self.words.read();
        let Some(word) = words.get(slot as usize) else {
            return EntityFlags::EMPTY;
        };
        let next = f(EntityFlags::from_bits(word.load(Ordering::Acquire)));
        word.store(next.bits(), Ordering::Release);
        next
    }

    /// Zeroes every word.
    pub fn clear_all(&self) {
        for word in self.words.read().iter() {
            word.store(0, Ordering::Release);
        }
    }

    /// Point-in-time copy of every word.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u32> {
        self.words
            .read()
            .iter()
            .map(|w| w.load(Ordering::Acquire))
            .collect()
    }
}

impl Default for FlagTable {
    fn default() -> Self {
        Self::with_len(0)
    }
}
