//! Linear memory hand-off
//!
//! The host starts the module with whatever memory the linker asked for.
//! The shim grows it once to a fixed operating size and claims everything
//! between the linker's `__heap_base` and the end of memory as the single
//! region the arena allocator carves up.
//!
//! # Safety Invariants
//!
//! 1. **Claimed once**: The heap region is handed out at most once per
//!    process, so the returned `&'static mut` is never aliased
//! 2. **Committed memory only**: The region never extends past the current
//!    memory size after growing
//! 3. **Disjoint from static data**: The region starts at `__heap_base`,
//!    after the data segments and the shadow stack

use core::fmt;

use crate::sync::InitLatch;

/// Size of one WASM linear memory page.
pub const WASM_PAGE_SIZE: usize = 65536;

/// Failures while preparing the heap region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryError {
    /// `memory.grow` refused to extend memory to the requested size.
    GrowFailed {
        /// Pages the shim asked to reach
        requested_pages: usize,
    },
    /// The linker placed `__heap_base` past the end of memory.
    HeapBaseBeyondMemory,
    /// The heap region was already handed out.
    AlreadyClaimed,
    /// There is no linear memory to claim on this target.
    Unsupported,
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::GrowFailed { requested_pages } => {
                write!(f, "memory.grow to {} pages failed", requested_pages)
            }
            MemoryError::HeapBaseBeyondMemory => f.write_str("heap base lies beyond memory end"),
            MemoryError::AlreadyClaimed => f.write_str("heap region already claimed"),
            MemoryError::Unsupported => f.write_str("linear memory unavailable on this target"),
        }
    }
}

static HEAP_LATCH: InitLatch = InitLatch::new();

#[cfg(target_arch = "wasm32")]
extern "C" {
    /// First address past static data and the stack, provided by wasm-ld.
    static __heap_base: u8;
}

/// Grow linear memory to at least `pages` pages and claim the heap region.
///
/// Memory is never shrunk: if it is already larger, the whole tail past
/// `__heap_base` is returned. Subsequent calls fail with `AlreadyClaimed`.
#[cfg(target_arch = "wasm32")]
pub fn claim_heap(pages: usize) -> Result<&'static mut [u8], MemoryError> {
    use core::arch::wasm32::{memory_grow, memory_size};

    if !HEAP_LATCH.try_begin() {
        return Err(MemoryError::AlreadyClaimed);
    }

    let current = memory_size(0);
    if current < pages && memory_grow(0, pages - current) == usize::MAX {
        return Err(MemoryError::GrowFailed {
            requested_pages: pages,
        });
    }

    // SAFETY: Only the address of the linker symbol is taken; it is never read.
    let start = unsafe { core::ptr::addr_of!(__heap_base) } as usize;
    let end = memory_size(0) * WASM_PAGE_SIZE;
    if start > end {
        return Err(MemoryError::HeapBaseBeyondMemory);
    }

    HEAP_LATCH.finish();

    // SAFETY: [start, end) is committed linear memory that no Rust object
    // occupies (it lies past __heap_base), and the latch guarantees this
    // slice is created only once for the lifetime of the process.
    Ok(unsafe { core::slice::from_raw_parts_mut(start as *mut u8, end - start) })
}

#[cfg(not(target_arch = "wasm32"))]
pub fn claim_heap(_pages: usize) -> Result<&'static mut [u8], MemoryError> {
    if !HEAP_LATCH.try_begin() {
        return Err(MemoryError::AlreadyClaimed);
    }
    Err(MemoryError::Unsupported)
}

/// Abort the instance.
///
/// The host has no process-exit concept; a trap rolls back the current
/// message and is the only way to stop without replying.
pub fn trap() -> ! {
    #[cfg(target_arch = "wasm32")]
    {
        core::arch::wasm32::unreachable()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        panic!("trap outside WASM")
    }
}
