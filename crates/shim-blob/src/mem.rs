//! libc-shaped buffer helpers.
//!
//! Freestanding programs expect `memset`, `memcpy`, `memmove`, `memchr` and
//! `strlen`. These are the slice versions, with lengths checked instead of
//! trusted.

use core::ops::Range;

use crate::error::BlobError;

/// Set every byte of `dst` to `byte` (`memset`).
pub fn fill(dst: &mut [u8], byte: u8) {
    dst.fill(byte);
}

/// Copy all of `src` to the start of `dst` (`memcpy`). Returns `src.len()`.
pub fn copy(dst: &mut [u8], src: &[u8]) -> Result<usize, BlobError> {
    let capacity = dst.len();
    let target = dst.get_mut(..src.len()).ok_or(BlobError::DestinationTooSmall {
        needed: src.len(),
        capacity,
    })?;
    target.copy_from_slice(src);
    Ok(src.len())
}

/// Copy `buf[src]` to `buf[dest..]`; the ranges may overlap (`memmove`).
pub fn move_within(buf: &mut [u8], src: Range<usize>, dest: usize) -> Result<(), BlobError> {
    let len = src.end.saturating_sub(src.start);
    let src_ok = src.start <= src.end && src.end <= buf.len();
    let dest_ok = dest.checked_add(len).is_some_and(|end| end <= buf.len());
    if !src_ok || !dest_ok {
        return Err(BlobError::OutOfBounds {
            requested: src.end.max(dest.saturating_add(len)),
            available: buf.len(),
        });
    }
    buf.copy_within(src, dest);
    Ok(())
}

/// Index of the first `byte` in `haystack` (`memchr`).
pub fn find_byte(haystack: &[u8], byte: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == byte)
}

/// Length of a NUL-terminated string, terminator excluded (`strlen`).
///
/// Without a NUL the whole slice counts.
pub fn c_str_len(bytes: &[u8]) -> usize {
    find_byte(bytes, 0).unwrap_or(bytes.len())
}
