//! Host seam
//!
//! Everything the dispatcher needs from the environment goes through
//! [`Host`]. On wasm32 that is [`Ic0Host`], a thin layer over the `ic0`
//! imports; tests use `testing::MockHost`.

use shim_primitives::{ffi, memory};

use crate::error::HostError;

/// The primitives a host environment provides to the shim.
pub trait Host {
    /// Byte length of the incoming message.
    fn incoming_size(&self) -> usize;

    /// Copy `dst.len()` bytes of the incoming message, starting at `offset`.
    fn copy_incoming(&mut self, dst: &mut [u8], offset: usize) -> Result<(), HostError>;

    /// Append bytes to the reply under construction.
    fn append_reply(&mut self, bytes: &[u8]);

    /// Send the accumulated reply. Called at most once per call.
    fn finish_reply(&mut self);

    /// Emit a diagnostic line.
    fn debug_log(&mut self, msg: &[u8]);

    /// Grow linear memory to at least `pages` pages and hand over the
    /// region above the static data. Succeeds at most once per instance.
    fn grow_linear_memory(&mut self, pages: usize) -> Result<&'static mut [u8], HostError>;

    /// Abort the call. The host rolls back any state changes.
    fn trap(&mut self) -> !;
}

/// The real host: `ic0` imports plus the module's own linear memory.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ic0Host;

impl Host for Ic0Host {
    fn incoming_size(&self) -> usize {
        ffi::arg_data_size()
    }

    fn copy_incoming(&mut self, dst: &mut [u8], offset: usize) -> Result<(), HostError> {
        if ffi::arg_data_copy(dst, offset) {
            Ok(())
        } else {
            Err(HostError::ArgumentOutOfRange {
                offset,
                len: dst.len(),
                size: self.incoming_size(),
            })
        }
    }

    fn append_reply(&mut self, bytes: &[u8]) {
        ffi::reply_data_append(bytes);
    }

    fn finish_reply(&mut self) {
        ffi::reply();
    }

    fn debug_log(&mut self, msg: &[u8]) {
        ffi::debug(msg);
    }

    fn grow_linear_memory(&mut self, pages: usize) -> Result<&'static mut [u8], HostError> {
        Ok(memory::claim_heap(pages)?)
    }

    fn trap(&mut self) -> ! {
        memory::trap()
    }
}
