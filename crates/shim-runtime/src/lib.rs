//! canister-shim Runtime
//!
//! The host-invoked side of the shim: everything between an exported
//! `canister_update` symbol and the program logic it serves.
//!
//! - **Host**: trait over the imported primitives (`Ic0Host` on wasm,
//!   `testing::MockHost` in tests)
//! - **Dispatcher**: init-once state machine and per-call lifecycle
//!   (decode, run program, encode, reply)
//! - **CallContext**: what program logic sees: request stream, reply
//!   buffer, `data`/`save` blobs, arena
//! - **Entry macros**: `canister_update!` / `canister_query!` export a
//!   method backed by the process-wide dispatcher
//!
//! # Example
//!
//! ```ignore
//! use shim_runtime::{canister_update, CallContext, RuntimeError};
//! use shim_blob::ByteSink;
//!
//! fn reverse(ctx: &mut CallContext<'_>) -> Result<(), RuntimeError> {
//!     let text = ctx.request().read_to_end();
//!     for &byte in text.iter().rev() {
//!         ctx.output().put_char(byte)?;
//!     }
//!     Ok(())
//! }
//!
//! canister_update!("reverse" => reverse);
//! ```
//!
//! # Call Lifecycle
//!
//! ```text
//! host ──► entry ──► Dispatcher::run
//!                      │ first call: grow memory, carve data/save/staging/scratch
//!                      │ copy argument ──► decode envelope ──► request stream
//!                      │ reset scratch ──► Program::call(ctx)
//!                      │ write header in place ──► append reply ──► reply
//!                      └ any error: log through debug_print, trap
//! ```

#![cfg_attr(not(any(test, feature = "testing")), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatcher;
pub mod entry;
pub mod error;
pub mod host;
pub mod log;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export core types at crate root
pub use config::RuntimeConfig;
pub use dispatcher::{CallContext, Dispatcher, DispatcherState, Program};
pub use error::{ErrorKind, HostError, RuntimeError};
pub use host::{Host, Ic0Host};

// Re-export the layers below for programs that only depend on the runtime
pub use shim_arena as arena;
pub use shim_blob as blob;
pub use shim_envelope as envelope;

/// Export an update method backed by the shared dispatcher.
///
/// Generates an `extern "C"` function exported as
/// `"canister_update <name>"`. All methods exported from one module share
/// the same heap, blobs and buffers.
///
/// # Usage
///
/// ```ignore
/// canister_update!("play" => play);
/// canister_update!("play" => play, config = RuntimeConfig::DEFAULT.with_save_blob_len(4096));
/// ```
///
/// The configuration of whichever method runs first is the one used.
#[macro_export]
macro_rules! canister_update {
    ($name:literal => $program:expr) => {
        $crate::canister_update!($name => $program, config = $crate::RuntimeConfig::DEFAULT);
    };
    ($name:literal => $program:expr, config = $config:expr) => {
        $crate::__shim_export!(concat!("canister_update ", $name), $program, $config);
    };
}

/// Export a query method backed by the shared dispatcher.
///
/// Same as [`canister_update!`], exported as `"canister_query <name>"`.
/// The host discards state changes made during a query.
#[macro_export]
macro_rules! canister_query {
    ($name:literal => $program:expr) => {
        $crate::canister_query!($name => $program, config = $crate::RuntimeConfig::DEFAULT);
    };
    ($name:literal => $program:expr, config = $config:expr) => {
        $crate::__shim_export!(concat!("canister_query ", $name), $program, $config);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __shim_export {
    ($symbol:expr, $program:expr, $config:expr) => {
        #[cfg(target_arch = "wasm32")]
        const _: () = {
            #[export_name = $symbol]
            extern "C" fn __shim_entry() {
                let mut program = $program;
                $crate::entry::run(&mut program, $config);
            }
        };
    };
}
