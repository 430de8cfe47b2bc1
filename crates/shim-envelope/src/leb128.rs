//! Unsigned LEB128
//!
//! Non-negative integers as base-128 groups, least significant first. Every
//! group except the last has its high (continuation) bit set.
//!
//! Two encodings are produced:
//! - the fixed 5-group form used in reply headers (lengths below 2^35), which
//!   keeps the header a constant 12 bytes;
//! - the minimal form, as a host would send it.
//!
//! The decoder accepts both, and any padding in between.

use crate::error::EnvelopeError;

/// Number of groups in the fixed-width form.
pub const FIXED_LEN: usize = 5;

/// Largest number of groups a `u64` can need.
pub const MAX_LEN: usize = 10;

/// Exclusive upper bound of values the fixed-width form can carry.
pub const FIXED_LIMIT: u64 = 1 << (7 * FIXED_LEN as u32);

const CONTINUATION: u8 = 0x80;
const GROUP_MASK: u64 = 0x7F;

/// Fixed 5-group encoding of a 32-bit value. Never fails.
pub const fn fixed5(n: u32) -> [u8; FIXED_LEN] {
    let n = n as u64;
    [
        (n & GROUP_MASK) as u8 | CONTINUATION,
        ((n >> 7) & GROUP_MASK) as u8 | CONTINUATION,
        ((n >> 14) & GROUP_MASK) as u8 | CONTINUATION,
        ((n >> 21) & GROUP_MASK) as u8 | CONTINUATION,
        ((n >> 28) & GROUP_MASK) as u8,
    ]
}

/// Fixed 5-group encoding of any value below 2^35.
pub fn encode_fixed5(n: u64) -> Result<[u8; FIXED_LEN], EnvelopeError> {
    if n >= FIXED_LIMIT {
        return Err(EnvelopeError::LengthOverflow {
            max_bits: 7 * FIXED_LEN as u32,
        });
    }

    let mut out = [0u8; FIXED_LEN];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = ((n >> (7 * i)) & GROUP_MASK) as u8;
        if i + 1 < FIXED_LEN {
            *byte |= CONTINUATION;
        }
    }
    Ok(out)
}

/// Shortest encoding of `n`. Returns the number of bytes written to `out`.
pub fn encode_minimal(mut n: u64, out: &mut [u8; MAX_LEN]) -> usize {
    let mut len = 0;
    loop {
        let group = (n & GROUP_MASK) as u8;
        n >>= 7;
        if n == 0 {
            out[len] = group;
            return len + 1;
        }
        out[len] = group | CONTINUATION;
        len += 1;
    }
}

/// Decode a value from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed, terminal group
/// included. Errors are reported relative to `bytes`.
pub fn decode(bytes: &[u8]) -> Result<(u64, usize), EnvelopeError> {
    let mut value: u64 = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        let group = (byte as u64) & GROUP_MASK;
        let shift = 7 * i as u32;

        // The tenth group may only contribute the top bit of a u64.
        if shift >= 64 || (shift == 63 && group > 1) {
            return Err(EnvelopeError::LengthOverflow { max_bits: 64 });
        }

        value |= group << shift;
        if byte & CONTINUATION == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(EnvelopeError::Truncated {
        needed: bytes.len() + 1,
        available: bytes.len(),
    })
}

// ============================================================================
// Kani Proofs for the Fixed-Width Form
// ============================================================================

#[cfg(kani)]
mod proofs {
    use super::*;

    /// Proof: every 5-group encoding decodes back to its value
    #[kani::proof]
    #[kani::unwind(6)]
    fn fixed5_round_trip() {
        let n: u64 = kani::any();
        kani::assume(n < FIXED_LIMIT);

        let bytes = encode_fixed5(n).unwrap();
        let (decoded, used) = decode(&bytes).unwrap();
        kani::assert(decoded == n, "Decoded value must match");
        kani::assert(used == FIXED_LEN, "All five groups must be consumed");
    }
}
