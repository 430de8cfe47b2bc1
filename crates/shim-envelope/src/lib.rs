//! Envelope Codec
//!
//! Binary encoding/decoding of the self-describing envelope exchanged with
//! the host. An envelope carries exactly one text value:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | magic `"DIDL"` |
//! | 4 | 3 | type table: `00 01 71` (no type definitions, one value, text) |
//! | 7 | 1..=10 | payload length, unsigned LEB128 |
//! | 7+k | length | payload bytes |
//!
//! Replies always use the 5-byte length form so the header has a fixed
//! size of [`HEADER_LEN`] and can be reserved before the payload is known.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod error;
pub mod leb128;
pub mod wire;

pub use error::EnvelopeError;
pub use wire::{
    decode, encode_header, HEADER_LEN, MAGIC, MIN_ENVELOPE_LEN, PREFIX_LEN, TYPE_TABLE,
};
