//! Reply scratch buffer
//!
//! The envelope header carries the payload length, so the reply cannot be
//! streamed to the host as it is produced. Output is collected here behind
//! a reserved [`HEADER_LEN`]-byte prefix; `finish` fills the prefix in place
//! and hands back one contiguous span.
//!
//! ```text
//! ┌──────────────────────┬──────────────────────────┬───────────────┐
//! │ header (12, reserved)│ payload (appended)       │ free          │
//! └──────────────────────┴──────────────────────────┴───────────────┘
//!                         ^ reset() puts the cursor here
//! ```

use core::fmt;

use shim_envelope::{encode_header, HEADER_LEN};

use crate::error::BlobError;
use crate::io::ByteSink;

/// Append-only reply buffer with a reserved envelope header.
pub struct OutputBuffer<'a> {
    buf: &'a mut [u8],
    cursor: usize,
}

impl<'a> OutputBuffer<'a> {
    /// Use `buf` as reply storage. It must at least hold the header.
    pub fn new(buf: &'a mut [u8]) -> Result<Self, BlobError> {
        if buf.len() < HEADER_LEN {
            return Err(BlobError::CapacityExceeded {
                requested: HEADER_LEN,
                remaining: buf.len(),
            });
        }
        Ok(Self {
            buf,
            cursor: HEADER_LEN,
        })
    }

    /// Discard the payload; the write cursor returns to just past the header.
    ///
    /// Old bytes are not cleared, only forgotten.
    pub fn reset(&mut self) {
        self.cursor = HEADER_LEN;
    }

    /// Bytes written since the last reset.
    pub fn payload(&self) -> &[u8] {
        &self.buf[HEADER_LEN..self.cursor]
    }

    /// Length of the payload written since the last reset.
    pub fn payload_len(&self) -> usize {
        self.cursor - HEADER_LEN
    }

    /// Largest payload this buffer can hold.
    pub fn payload_capacity(&self) -> usize {
        self.buf.len() - HEADER_LEN
    }

    /// Write the header for the current payload and return header + payload.
    pub fn finish(&mut self) -> Result<&[u8], BlobError> {
        let len = self.payload_len();
        let encoded = u32::try_from(len).map_err(|_| BlobError::PayloadTooLarge { len })?;

        self.buf[..HEADER_LEN].copy_from_slice(&encode_header(encoded));

        Ok(&self.buf[..self.cursor])
    }
}

impl ByteSink for OutputBuffer<'_> {
    fn remaining_capacity(&self) -> usize {
        self.buf.len() - self.cursor
    }

    fn write_exact(&mut self, bytes: &[u8]) -> Result<(), BlobError> {
        if bytes.len() > self.remaining_capacity() {
            return Err(self.overflow(bytes.len()));
        }
        self.buf[self.cursor..self.cursor + bytes.len()].copy_from_slice(bytes);
        self.cursor += bytes.len();
        Ok(())
    }

    fn overflow(&self, needed: usize) -> BlobError {
        BlobError::CapacityExceeded {
            requested: needed,
            remaining: self.remaining_capacity(),
        }
    }
}

impl fmt::Write for OutputBuffer<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_exact(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl fmt::Debug for OutputBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputBuffer")
            .field("capacity", &self.buf.len())
            .field("payload_len", &self.payload_len())
            .finish()
    }
}
