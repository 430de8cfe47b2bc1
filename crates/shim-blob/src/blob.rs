//! Read-write virtual files over fixed regions.
//!
//! The shim keeps two of these for the lifetime of the instance: `data`
//! (content the program loads once) and `save` (state it writes back).
//! Their cursors survive between calls; `open` rewinds.

use crate::error::BlobError;
use crate::io::{ByteSink, ByteSource};

/// A fixed-size in-memory region used as a file.
pub struct Blob<'a> {
    region: &'a mut [u8],
    cursor: usize,
}

impl<'a> Blob<'a> {
    /// Wrap `region`; the cursor starts at offset 0.
    pub fn new(region: &'a mut [u8]) -> Self {
        Self { region, cursor: 0 }
    }

    /// Rewind to the start and return the handle (`fopen`).
    pub fn open(&mut self) -> &mut Self {
        self.cursor = 0;
        self
    }

    /// Release the handle (`fclose`). The region and its contents stay.
    pub fn close(&mut self) {}

    /// Current offset from the start of the blob.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Move the cursor to `offset`; the end of the blob is a valid position.
    pub fn seek(&mut self, offset: usize) -> Result<(), BlobError> {
        if offset > self.region.len() {
            return Err(BlobError::OutOfBounds {
                requested: offset,
                available: self.region.len(),
            });
        }
        self.cursor = offset;
        Ok(())
    }

    /// Size of the underlying region.
    pub fn len(&self) -> usize {
        self.region.len()
    }

    /// Whether the region is zero-sized.
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// The whole region, independent of the cursor.
    pub fn as_bytes(&self) -> &[u8] {
        &*self.region
    }

    /// The whole region, mutably (bulk preload).
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.region
    }
}

impl ByteSource for Blob<'_> {
    fn remaining(&self) -> usize {
        self.region.len() - self.cursor
    }

    fn peek_byte(&self) -> Option<u8> {
        self.region.get(self.cursor).copied()
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        self.cursor += 1;
        Some(byte)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), BlobError> {
        let available = ByteSource::remaining(self);
        if buf.len() > available {
            return Err(BlobError::OutOfBounds {
                requested: buf.len(),
                available,
            });
        }
        buf.copy_from_slice(&self.region[self.cursor..self.cursor + buf.len()]);
        self.cursor += buf.len();
        Ok(())
    }
}

impl ByteSink for Blob<'_> {
    fn remaining_capacity(&self) -> usize {
        self.region.len() - self.cursor
    }

    fn write_exact(&mut self, bytes: &[u8]) -> Result<(), BlobError> {
        if bytes.len() > self.remaining_capacity() {
            return Err(self.overflow(bytes.len()));
        }
        self.region[self.cursor..self.cursor + bytes.len()].copy_from_slice(bytes);
        self.cursor += bytes.len();
        Ok(())
    }
}

impl core::fmt::Debug for Blob<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Blob")
            .field("len", &self.region.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}
