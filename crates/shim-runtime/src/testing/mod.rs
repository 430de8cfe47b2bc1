//! Test doubles for the host seam.
//!
//! Available with the `testing` feature (and in this crate's own tests).

mod mock_host;

pub use mock_host::MockHost;

use shim_envelope::{encode_header, leb128, MAGIC, TYPE_TABLE};

/// Wrap `payload` in an envelope with the fixed 5-group length.
pub fn envelope(payload: &[u8]) -> Vec<u8> {
    let mut bytes = encode_header(payload.len() as u32).to_vec();
    bytes.extend_from_slice(payload);
    bytes
}

/// Wrap `payload` in an envelope with the shortest length encoding.
pub fn minimal_envelope(payload: &[u8]) -> Vec<u8> {
    let mut len = [0u8; leb128::MAX_LEN];
    let n = leb128::encode_minimal(payload.len() as u64, &mut len);
    let mut bytes = Vec::with_capacity(MAGIC.len() + TYPE_TABLE.len() + n + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&TYPE_TABLE);
    bytes.extend_from_slice(&len[..n]);
    bytes.extend_from_slice(payload);
    bytes
}
