//! In-memory host for tests.
//!
//! Records everything the dispatcher sends and hands out a leaked `Vec` as
//! linear memory. A trap becomes a panic carrying the last log line.

use shim_primitives::{MemoryError, WASM_PAGE_SIZE};

use crate::error::HostError;
use crate::host::Host;

/// Host double backed by plain vectors.
#[derive(Debug, Default)]
pub struct MockHost {
    incoming: Vec<u8>,
    pending: Vec<u8>,
    replies: Vec<Vec<u8>>,
    logs: Vec<String>,
    heap_len: Option<usize>,
    heap_claimed: bool,
    grow_calls: usize,
}

impl MockHost {
    /// A host with an empty incoming message and as much memory as asked for.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out exactly `len` bytes of heap regardless of the page request.
    pub fn with_heap_len(mut self, len: usize) -> Self {
        self.heap_len = Some(len);
        self
    }

    /// Set the raw argument bytes of the next call.
    pub fn set_request(&mut self, bytes: &[u8]) {
        self.incoming.clear();
        self.incoming.extend_from_slice(bytes);
    }

    /// Every completed reply, oldest first.
    pub fn replies(&self) -> &[Vec<u8>] {
        &self.replies
    }

    pub fn last_reply(&self) -> Option<&[u8]> {
        self.replies.last().map(Vec::as_slice)
    }

    /// Payload of the last reply, if it decodes.
    pub fn last_payload(&self) -> Option<&[u8]> {
        shim_envelope::decode(self.last_reply()?).ok()
    }

    /// Debug lines, lossily decoded.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// How often `grow_linear_memory` was called.
    pub fn grow_calls(&self) -> usize {
        self.grow_calls
    }
}

impl Host for MockHost {
    fn incoming_size(&self) -> usize {
        self.incoming.len()
    }

    fn copy_incoming(&mut self, dst: &mut [u8], offset: usize) -> Result<(), HostError> {
        let src = offset
            .checked_add(dst.len())
            .and_then(|end| self.incoming.get(offset..end))
            .ok_or(HostError::ArgumentOutOfRange {
                offset,
                len: dst.len(),
                size: self.incoming.len(),
            })?;
        dst.copy_from_slice(src);
        Ok(())
    }

    fn append_reply(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    fn finish_reply(&mut self) {
        let reply = core::mem::take(&mut self.pending);
        self.replies.push(reply);
    }

    fn debug_log(&mut self, msg: &[u8]) {
        self.logs.push(String::from_utf8_lossy(msg).into_owned());
    }

    fn grow_linear_memory(&mut self, pages: usize) -> Result<&'static mut [u8], HostError> {
        self.grow_calls += 1;
        if self.heap_claimed {
            return Err(MemoryError::AlreadyClaimed.into());
        }
        self.heap_claimed = true;

        let len = self.heap_len.unwrap_or(pages * WASM_PAGE_SIZE);
        Ok(vec![0u8; len].leak())
    }

    fn trap(&mut self) -> ! {
        panic!("trap: {}", self.logs.last().map(String::as_str).unwrap_or(""))
    }
}
