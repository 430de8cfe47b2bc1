//! Stream Integration Tests
//!
//! Tests that programs written against `ByteSource`/`ByteSink` behave the
//! same whichever backing store they are handed.

use shim_blob::{mem, Blob, BlobError, ByteSink, ByteSource, OutputBuffer, ReadCursor};

/// Copy lines from `src` to `dst`, upper-casing them, the way a C program
/// would loop over `fgets`/`fputs`.
fn shout<S: ByteSource, D: ByteSink>(src: &mut S, dst: &mut D) -> Result<usize, BlobError> {
    let mut line = [0u8; 17];
    let mut lines = 0;
    loop {
        let n = src.read_line(&mut line, 16)?;
        if n == 0 {
            return Ok(lines);
        }
        line[..n].make_ascii_uppercase();
        dst.write_exact(&line[..n])?;
        lines += 1;
    }
}

/// Test that the request stream and the reply buffer compose.
#[test]
fn test_cursor_into_output() {
    let mut src = ReadCursor::new(b"get lamp\nnorth\n");
    let mut storage = [0u8; 64];
    let mut out = OutputBuffer::new(&mut storage).unwrap();

    assert_eq!(shout(&mut src, &mut out).unwrap(), 2);
    assert_eq!(out.payload(), b"GET LAMP\nNORTH\n");
    assert!(src.is_exhausted());
}

/// Test that a blob can be the destination and then the source.
#[test]
fn test_blob_round_trip_through_generic_code() {
    let mut region = [0u8; 32];
    let mut save = Blob::new(&mut region);

    let mut src = ReadCursor::new(b"score 10\nmoves 4");
    shout(&mut src, save.open()).unwrap();
    assert_eq!(mem::c_str_len(save.as_bytes()), 16);

    let mut storage = [0u8; 64];
    let mut out = OutputBuffer::new(&mut storage).unwrap();
    // The zeroed tail of the blob reads as an empty line and stops the loop.
    assert_eq!(shout(save.open(), &mut out).unwrap(), 2);
    assert_eq!(out.payload(), b"SCORE 10\nMOVES 4");
}

/// Test that long lines arrive in pieces of at most `max - 1` bytes.
#[test]
fn test_long_line_is_split() {
    let mut src = ReadCursor::new(b"0123456789abcdefghij\n");
    let mut storage = [0u8; 64];
    let mut out = OutputBuffer::new(&mut storage).unwrap();

    assert_eq!(shout(&mut src, &mut out).unwrap(), 2);
    assert_eq!(out.payload(), b"0123456789ABCDEFGHIJ\n");
}

/// Test that a full destination reports which limit was hit.
#[test]
fn test_destination_full() {
    let mut region = [0u8; 4];
    let mut blob = Blob::new(&mut region);
    let mut src = ReadCursor::new(b"xyzzy\n");
    assert!(matches!(
        shout(&mut src, &mut blob),
        Err(BlobError::OutOfBounds { .. })
    ));

    let mut storage = [0u8; 14];
    let mut out = OutputBuffer::new(&mut storage).unwrap();
    let mut src = ReadCursor::new(b"xyzzy\n");
    assert!(matches!(
        shout(&mut src, &mut out),
        Err(BlobError::CapacityExceeded { .. })
    ));
}
