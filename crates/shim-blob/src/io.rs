//! Capability traits for readable and writable byte stores.
//!
//! Program logic takes `&mut impl ByteSource` / `&mut impl ByteSink` instead
//! of a concrete blob, so the same routine can read a save file, the request
//! payload or a static text blob.

use crate::error::BlobError;

/// A sequential, cursor-based byte source.
pub trait ByteSource {
    /// Bytes left before the end of the source.
    fn remaining(&self) -> usize;

    /// Next byte without consuming it.
    fn peek_byte(&self) -> Option<u8>;

    /// Consume and return the next byte, or `None` at the end.
    fn read_byte(&mut self) -> Option<u8>;

    /// Fill `buf` completely and advance past it.
    ///
    /// Fails without consuming anything when fewer than `buf.len()` bytes
    /// remain.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), BlobError>;

    /// Read one line into `out`, `fgets`-style.
    ///
    /// Copies bytes until a newline (copied), a NUL (consumed, not copied),
    /// the end of the source, or `max - 1` copied bytes. A newline sitting
    /// exactly at that limit is still taken with its line. A NUL is written
    /// after the copied bytes, so `out` must hold `max + 1` bytes.
    ///
    /// Unlike `fgets`, `max` is not the buffer size: `read_line(&mut buf,
    /// buf.len())` always fails. Use [`ByteSource::read_line_into`] when the
    /// whole buffer should bound the line.
    ///
    /// Returns the number of bytes copied, terminator excluded.
    fn read_line(&mut self, out: &mut [u8], max: usize) -> Result<usize, BlobError> {
        if max == 0 {
            return Ok(0);
        }
        if out.len() <= max {
            return Err(BlobError::DestinationTooSmall {
                needed: max.saturating_add(1),
                capacity: out.len(),
            });
        }

        let limit = max - 1;
        let mut n = 0;
        loop {
            if n == limit {
                if self.peek_byte() == Some(b'\n') {
                    self.read_byte();
                    out[n] = b'\n';
                    n += 1;
                }
                break;
            }
            match self.read_byte() {
                None | Some(0) => break,
                Some(byte) => {
                    out[n] = byte;
                    n += 1;
                    if byte == b'\n' {
                        break;
                    }
                }
            }
        }

        out[n] = 0;
        Ok(n)
    }

    /// Read one line bounded by the size of `out` (`fgets(buf, sizeof buf)`).
    ///
    /// Same as [`ByteSource::read_line`] with `max = out.len() - 1`, leaving
    /// the last byte for the terminator. An empty `out` reads nothing.
    fn read_line_into(&mut self, out: &mut [u8]) -> Result<usize, BlobError> {
        let max = out.len().saturating_sub(1);
        self.read_line(out, max)
    }

    /// Read `count` records of `size` bytes each (`fread`).
    ///
    /// Returns `count`. Fails without consuming anything if the source or
    /// `buf` is too short.
    fn read_records(&mut self, buf: &mut [u8], size: usize, count: usize) -> Result<usize, BlobError> {
        let total = record_bytes(size, count)?;
        let capacity = buf.len();
        let dst = buf.get_mut(..total).ok_or(BlobError::DestinationTooSmall {
            needed: total,
            capacity,
        })?;
        self.read_exact(dst)?;
        Ok(count)
    }
}

/// A sequential, cursor-based byte sink.
pub trait ByteSink {
    /// Bytes that can still be written.
    fn remaining_capacity(&self) -> usize;

    /// Write all of `bytes` and advance past them.
    ///
    /// Fails without writing anything when `bytes` does not fit.
    fn write_exact(&mut self, bytes: &[u8]) -> Result<(), BlobError>;

    /// Write a single byte (`putchar`).
    fn put_char(&mut self, byte: u8) -> Result<(), BlobError> {
        self.write_exact(&[byte])
    }

    /// Write a UTF-8 string without a terminator.
    fn put_str(&mut self, s: &str) -> Result<(), BlobError> {
        self.write_exact(s.as_bytes())
    }

    /// Write `line` followed by a newline (`puts`). All or nothing.
    fn put_line(&mut self, line: &[u8]) -> Result<(), BlobError> {
        let needed = line.len() + 1;
        if needed > self.remaining_capacity() {
            return Err(self.overflow(needed));
        }
        self.write_exact(line)?;
        self.put_char(b'\n')
    }

    /// Write `count` records of `size` bytes each from `buf` (`fwrite`).
    ///
    /// Returns `count`.
    fn write_records(&mut self, buf: &[u8], size: usize, count: usize) -> Result<usize, BlobError> {
        let total = record_bytes(size, count)?;
        let src = buf.get(..total).ok_or(BlobError::OutOfBounds {
            requested: total,
            available: buf.len(),
        })?;
        self.write_exact(src)?;
        Ok(count)
    }

    /// The error this sink reports when `needed` bytes do not fit.
    fn overflow(&self, needed: usize) -> BlobError {
        BlobError::OutOfBounds {
            requested: needed,
            available: self.remaining_capacity(),
        }
    }
}

fn record_bytes(size: usize, count: usize) -> Result<usize, BlobError> {
    size.checked_mul(count).ok_or(BlobError::OutOfBounds {
        requested: usize::MAX,
        available: 0,
    })
}
