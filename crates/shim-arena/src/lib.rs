//! Bump Arena for canister-shim
//!
//! A single-threaded, monotonic allocator over one fixed region of linear
//! memory. It hands out byte ranges by advancing a cursor and never frees
//! anything; the whole region lives as long as the module instance.
//!
//! Unlike a `GlobalAlloc`, the arena returns borrowed slices, so the borrow
//! checker enforces that two allocations never alias. Exhaustion is a
//! checked error instead of a null pointer.
//!
//! # Usage
//!
//! ```ignore
//! let mut arena = Arena::new(shim_primitives::claim_heap(10)?);
//! let data = arena.allocate(65536)?;
//! let save = arena.allocate(65536)?;
//! ```
//!
//! # Default Layout
//!
//! | Region | Size | Rationale |
//! |--------|------|-----------|
//! | data blob | 64KB | Read-mostly program content |
//! | save blob | 64KB | State persisted across calls |
//! | staging buffer | 2KB | Incoming envelope copy |
//! | scratch buffer | 2KB | Outgoing envelope under construction |

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

use core::mem;

/// Errors from arena allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    /// The request does not fit in what is left of the region.
    #[error("arena capacity exceeded: requested {requested} bytes, {remaining} remaining")]
    CapacityExceeded { requested: usize, remaining: usize },

    /// `count * size` does not fit in `usize`.
    #[error("allocation size overflow: {count} x {size}")]
    SizeOverflow { count: usize, size: usize },
}

/// Monotonic bump allocator over a borrowed region.
///
/// `cursor` only moves forward; every allocation is `[cursor, cursor + n)`
/// relative to `base`.
pub struct Arena<'a> {
    /// Not yet allocated tail of the region
    free: &'a mut [u8],
    /// Address of the first byte of the region
    base: usize,
    /// Bytes handed out so far
    cursor: usize,
    /// Total size of the region
    capacity: usize,
}

impl<'a> Arena<'a> {
    /// Create an arena spanning `region`.
    pub fn new(region: &'a mut [u8]) -> Self {
        Self {
            base: region.as_ptr() as usize,
            capacity: region.len(),
            cursor: 0,
            free: region,
        }
    }

    /// Allocate exactly `n` bytes.
    ///
    /// The contents are whatever the region held before; use
    /// [`Arena::allocate_zeroed`] when that matters. On failure the cursor
    /// does not move.
    pub fn allocate(&mut self, n: usize) -> Result<&'a mut [u8], ArenaError> {
        if n > self.free.len() {
            return Err(ArenaError::CapacityExceeded {
                requested: n,
                remaining: self.free.len(),
            });
        }

        let free = mem::take(&mut self.free);
        let (claimed, rest) = free.split_at_mut(n);
        self.free = rest;
        self.cursor += n;
        Ok(claimed)
    }

    /// Allocate `count * size` zeroed bytes (`calloc`).
    pub fn allocate_zeroed(&mut self, count: usize, size: usize) -> Result<&'a mut [u8], ArenaError> {
        let n = count
            .checked_mul(size)
            .ok_or(ArenaError::SizeOverflow { count, size })?;
        let block = self.allocate(n)?;
        block.fill(0);
        Ok(block)
    }

    /// Address of the first byte of the region.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Bytes handed out so far (offset of the next allocation from `base`).
    pub fn current_position(&self) -> usize {
        self.cursor
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.capacity - self.cursor
    }

    /// Total size of the region.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl core::fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Arena")
            .field("base", &format_args!("{:#x}", self.base))
            .field("cursor", &self.cursor)
            .field("capacity", &self.capacity)
            .finish()
    }
}

// ============================================================================
// Kani Proofs for Arena Invariants
// ============================================================================

#[cfg(kani)]
mod proofs {
    use super::*;

    /// Proof: Consecutive allocations are adjacent and don't overlap
    #[kani::proof]
    #[kani::unwind(2)]
    fn no_overlap() {
        let mut region = [0u8; 64];
        let mut arena = Arena::new(&mut region);

        let n1: usize = kani::any();
        let n2: usize = kani::any();
        kani::assume(n1 <= 32 && n2 <= 32);

        let a = arena.allocate(n1).unwrap().as_ptr() as usize;
        let b = arena.allocate(n2).unwrap().as_ptr() as usize;

        kani::assert(a + n1 <= b, "Consecutive allocations must not overlap");
        kani::assert(b == arena.base() + n1, "Second range must start at base + n1");
    }

    /// Proof: Exhaustion fails without moving the cursor
    #[kani::proof]
    fn oom_keeps_cursor() {
        let mut region = [0u8; 16];
        let mut arena = Arena::new(&mut region);

        let n: usize = kani::any();
        kani::assume(n > 16);

        let before = arena.current_position();
        kani::assert(arena.allocate(n).is_err(), "Oversized request must fail");
        kani::assert(arena.current_position() == before, "Cursor must not move on failure");
    }
}
