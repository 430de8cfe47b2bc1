//! canister-shim Unsafe Primitives - Consolidated Unsafe Code TCB
//!
//! This crate contains ALL unsafe code in the shim, consolidated into a
//! single auditable location. Every other crate in the workspace uses
//! `#![deny(unsafe_code)]`.
//!
//! # Design Principles
//!
//! 1. **Minimal unsafe surface**: Only the host imports, the linear memory
//!    hand-off and the process-wide cell need it
//! 2. **Safe wrappers**: All unsafe is wrapped in safe interfaces
//! 3. **Auditable**: Small, focused modules for security review
//! 4. **Verified**: Kani proofs and loom models where applicable
//!
//! # Module Organization
//!
//! - `ffi` - Safe wrappers for the `ic0` host imports
//! - `memory` - Growing linear memory and claiming the heap region
//! - `sync` - One-way init latch and the single-instance cell
//! - `loom_tests` - Concurrency tests using loom (with `loom` feature)
//!
//! # Verification
//!
//! 1. **Kani proofs** (`cargo kani`): latch state machine
//! 2. **Loom tests** (`cargo test --features loom`): latch and busy flag under contention
//! 3. **Unit tests**: mocks and basic behaviour on the host target

#![cfg_attr(not(test), no_std)]

pub mod ffi;
pub mod memory;
pub mod sync;


// Re-export commonly used items
pub use memory::{claim_heap, trap, MemoryError, WASM_PAGE_SIZE};
pub use sync::{InitLatch, InstanceError, SingleInstance};
