//! One-way initialization latch and the process-wide instance cell
//!
//! The host serializes calls into a module instance, but the shim still
//! needs a place to keep its state between calls without `static mut`.
//! These types provide that place with a safe interface.
//!
//! # Safety Invariants
//!
//! 1. **One winner**: Exactly one caller ever moves the latch out of
//!    `UNINITIALIZED`
//! 2. **No backward transitions**: `READY` is terminal
//! 3. **Exclusive access**: `SingleInstance` hands out `&mut T` only while
//!    its busy flag is held, so a reentrant call is refused, never aliased

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

const UNINITIALIZED: u8 = 0;
const INITIALIZING: u8 = 1;
const READY: u8 = 2;

/// A one-way Uninitialized → Initializing → Ready latch.
pub struct InitLatch {
    state: AtomicU8,
}

impl InitLatch {
    /// Create a latch in the uninitialized state.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(UNINITIALIZED),
        }
    }

    /// Try to become the initializer.
    ///
    /// Returns `true` for exactly one caller over the lifetime of the latch.
    pub fn try_begin(&self) -> bool {
        self.state
            .compare_exchange(UNINITIALIZED, INITIALIZING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Mark initialization complete. Only the winner of `try_begin` calls this.
    pub fn finish(&self) {
        debug_assert_eq!(self.state.load(Ordering::Relaxed), INITIALIZING);
        self.state.store(READY, Ordering::Release);
    }

    /// Whether initialization has completed.
    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }
}

impl Default for InitLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Why `SingleInstance::with` refused to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceError {
    /// Another borrow is active (reentrant call).
    Busy,
    /// A previous initializer did not complete.
    Poisoned,
}

/// A lazily initialized value with one mutable borrower at a time.
///
/// Meant to live in a `static` so that every exported entry point of a
/// module reaches the same state.
pub struct SingleInstance<T> {
    latch: InitLatch,
    busy: AtomicBool,
    value: UnsafeCell<MaybeUninit<T>>,
}

// SAFETY: The value is only reached through `with`, which holds the busy
// flag for the whole borrow, so no two threads ever touch it at once.
// T: Send is required because the borrower may run on any thread.
unsafe impl<T: Send> Sync for SingleInstance<T> {}

impl<T> SingleInstance<T> {
    /// Create an empty cell.
    pub const fn new() -> Self {
        Self {
            latch: InitLatch::new(),
            busy: AtomicBool::new(false),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Whether the value has been created.
    pub fn is_initialized(&self) -> bool {
        self.latch.is_ready()
    }

    /// Run `f` on the value, creating it with `init` on first use.
    pub fn with<R>(
        &self,
        init: impl FnOnce() -> T,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, InstanceError> {
        if self.busy.swap(true, Ordering::Acquire) {
            return Err(InstanceError::Busy);
        }

        if self.latch.try_begin() {
            // SAFETY: We hold the busy flag and won the latch, so nobody else
            // can be reading or writing the slot.
            unsafe { (*self.value.get()).write(init()) };
            self.latch.finish();
        } else if !self.latch.is_ready() {
            self.busy.store(false, Ordering::Release);
            return Err(InstanceError::Poisoned);
        }

        // SAFETY: The latch is READY so the slot is initialized, and the busy
        // flag makes this the only live reference.
        let result = f(unsafe { (*self.value.get()).assume_init_mut() });
        self.busy.store(false, Ordering::Release);
        Ok(result)
    }
}

impl<T> Default for SingleInstance<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for SingleInstance<T> {
    fn drop(&mut self) {
        if self.latch.is_ready() {
            // SAFETY: READY means the slot was written, and `&mut self`
            // proves there are no outstanding borrows.
            unsafe { self.value.get_mut().assume_init_drop() };
        }
    }
}

// ============================================================================
// Kani Proofs for Latch Invariants
// ============================================================================

#[cfg(kani)]
mod proofs {
    use super::*;

    /// Proof: only the first `try_begin` wins
    #[kani::proof]
    fn single_winner() {
        let latch = InitLatch::new();
        let first = latch.try_begin();
        let second = latch.try_begin();
        kani::assert(first, "First caller must win");
        kani::assert(!second, "Second caller must lose");
    }

    /// Proof: READY is terminal
    #[kani::proof]
    fn ready_is_terminal() {
        let latch = InitLatch::new();
        kani::assume(latch.try_begin());
        latch.finish();
        let again: bool = latch.try_begin();
        kani::assert(!again, "Latch must not reopen");
        kani::assert(latch.is_ready(), "Latch must stay ready");
    }
}
