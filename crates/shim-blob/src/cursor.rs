//! Read-only streams over borrowed bytes.
//!
//! Used for the decoded request payload (rebuilt on every call) and for
//! static text blobs compiled into the program.

use crate::error::BlobError;
use crate::io::ByteSource;

/// A read-only cursor over a byte slice.
#[derive(Clone, Debug)]
pub struct ReadCursor<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> ReadCursor<'a> {
    /// Start reading `bytes` from the beginning.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// A stream that is exhausted from the start.
    pub fn empty() -> Self {
        Self::new(&[])
    }

    /// Current offset from the start of the stream.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Whether every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.bytes.len()
    }

    /// Every byte of the stream, read or not.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The unread bytes, without consuming them.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.cursor..]
    }

    /// Consume and return every unread byte.
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let rest = self.rest();
        self.cursor = self.bytes.len();
        rest
    }

    /// Copy every unread byte into `out` and NUL-terminate (`gets`).
    ///
    /// This is a single-shot "everything left" read, not a line read.
    /// Returns the number of bytes copied, terminator excluded.
    pub fn gets(&mut self, out: &mut [u8]) -> Result<usize, BlobError> {
        let rest = self.rest();
        if out.len() <= rest.len() {
            return Err(BlobError::DestinationTooSmall {
                needed: rest.len() + 1,
                capacity: out.len(),
            });
        }

        out[..rest.len()].copy_from_slice(rest);
        out[rest.len()] = 0;
        self.cursor = self.bytes.len();
        Ok(rest.len())
    }
}

impl ByteSource for ReadCursor<'_> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        self.cursor += 1;
        Some(byte)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), BlobError> {
        let available = self.remaining();
        if buf.len() > available {
            return Err(BlobError::OutOfBounds {
                requested: buf.len(),
                available,
            });
        }
        buf.copy_from_slice(&self.bytes[self.cursor..self.cursor + buf.len()]);
        self.cursor += buf.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stream_is_exhausted() {
        let mut stream = ReadCursor::empty();
        assert!(stream.is_exhausted());
        assert_eq!(stream.read_byte(), None);

        let mut out = [0xFFu8; 4];
        assert_eq!(stream.gets(&mut out).unwrap(), 0);
        assert_eq!(out[0], 0);
    }

    #[test]
    fn test_as_bytes_ignores_position() {
        let mut stream = ReadCursor::new(b"xyzzy");
        stream.read_byte();
        assert_eq!(stream.rest(), b"yzzy");
        assert_eq!(stream.as_bytes(), b"xyzzy");
    }

    #[test]
    fn test_gets_takes_everything_left() {
        let mut stream = ReadCursor::new(b"go north\nthen east");
        assert_eq!(stream.read_byte(), Some(b'g'));

        let mut out = [0u8; 32];
        let n = stream.gets(&mut out).unwrap();
        assert_eq!(&out[..n], b"o north\nthen east");
        assert_eq!(out[n], 0);
        assert!(stream.is_exhausted());

        // A second call finds nothing left.
        assert_eq!(stream.gets(&mut out).unwrap(), 0);
    }

    #[test]
    fn test_gets_needs_room_for_terminator() {
        let mut stream = ReadCursor::new(b"abcd");
        let mut out = [0u8; 4];
        assert_eq!(
            stream.gets(&mut out).unwrap_err(),
            BlobError::DestinationTooSmall {
                needed: 5,
                capacity: 4
            }
        );
        // Nothing consumed on failure
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_read_exact_bounds() {
        let mut stream = ReadCursor::new(b"abc");
        let mut buf = [0u8; 2];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ab");

        assert_eq!(
            stream.read_exact(&mut buf).unwrap_err(),
            BlobError::OutOfBounds {
                requested: 2,
                available: 1
            }
        );
        assert_eq!(stream.rest(), b"c");
    }

    #[test]
    fn test_read_line_keeps_newline_at_limit() {
        let mut stream = ReadCursor::new(b"abc\nxyz");
        let mut line = [0u8; 5];
        let n = stream.read_line(&mut line, 4).unwrap();
        assert_eq!(&line[..n], b"abc\n");
        assert_eq!(line[n], 0);
        assert_eq!(stream.rest(), b"xyz");
    }

    #[test]
    fn test_read_line_stops_at_limit() {
        let mut stream = ReadCursor::new(b"abcdef\n");
        let mut line = [0u8; 5];
        let n = stream.read_line(&mut line, 4).unwrap();
        assert_eq!(&line[..n], b"abc");
        assert_eq!(stream.rest(), b"def\n");
    }

    #[test]
    fn test_read_line_sequence() {
        let mut stream = ReadCursor::new(b"first\nsecond\nlast");
        let mut line = [0u8; 64];

        let n = stream.read_line(&mut line, 63).unwrap();
        assert_eq!(&line[..n], b"first\n");
        let n = stream.read_line(&mut line, 63).unwrap();
        assert_eq!(&line[..n], b"second\n");
        let n = stream.read_line(&mut line, 63).unwrap();
        assert_eq!(&line[..n], b"last");
        let n = stream.read_line(&mut line, 63).unwrap();
        assert_eq!(n, 0);
        assert_eq!(line[0], 0);
    }

    #[test]
    fn test_read_line_stops_at_nul() {
        let mut stream = ReadCursor::new(b"ab\0cd");
        let mut line = [0u8; 16];
        let n = stream.read_line(&mut line, 15).unwrap();
        assert_eq!(&line[..n], b"ab");
        // The NUL itself was consumed.
        assert_eq!(stream.rest(), b"cd");
    }

    #[test]
    fn test_read_line_zero_max() {
        let mut stream = ReadCursor::new(b"abc");
        assert_eq!(stream.read_line(&mut [], 0).unwrap(), 0);
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_read_line_small_destination() {
        let mut stream = ReadCursor::new(b"abc");
        let mut line = [0u8; 4];
        assert!(matches!(
            stream.read_line(&mut line, 4),
            Err(BlobError::DestinationTooSmall { needed: 5, capacity: 4 })
        ));
    }

    #[test]
    fn test_read_line_huge_max() {
        let mut stream = ReadCursor::new(b"abc\n");
        let mut line = [0u8; 16];
        assert_eq!(
            stream.read_line(&mut line, usize::MAX).unwrap_err(),
            BlobError::DestinationTooSmall {
                needed: usize::MAX,
                capacity: 16
            }
        );
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_read_line_into_uses_whole_buffer() {
        let mut stream = ReadCursor::new(b"abc\nxyz");
        let mut line = [0xFFu8; 5];
        let n = stream.read_line_into(&mut line).unwrap();
        assert_eq!(&line[..n], b"abc\n");
        assert_eq!(line[n], 0);

        let n = stream.read_line_into(&mut line).unwrap();
        assert_eq!(&line[..n], b"xyz");
        assert!(stream.is_exhausted());

        // Nothing to write the terminator into, so nothing is read.
        assert_eq!(stream.read_line_into(&mut []).unwrap(), 0);
    }

    #[test]
    fn test_read_records() {
        let mut stream = ReadCursor::new(&[1, 2, 3, 4, 5, 6, 7]);
        let mut buf = [0u8; 8];
        assert_eq!(stream.read_records(&mut buf, 2, 3).unwrap(), 3);
        assert_eq!(&buf[..6], &[1, 2, 3, 4, 5, 6]);
        assert!(stream.read_records(&mut buf, 2, 1).is_err());
    }
}
