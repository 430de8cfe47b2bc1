//! Wire Format
//!
//! Decoding of incoming envelopes and in-place encoding of reply headers.

use crate::error::EnvelopeError;
use crate::leb128;

/// Magic tag opening every envelope
pub const MAGIC: [u8; 4] = *b"DIDL";

/// Type table: zero type definitions, one value, of primitive type text (0x71)
pub const TYPE_TABLE: [u8; 3] = [0x00, 0x01, 0x71];

/// Magic plus type table
pub const PREFIX_LEN: usize = MAGIC.len() + TYPE_TABLE.len();

/// Prefix plus one length byte: the shortest well-formed envelope
pub const MIN_ENVELOPE_LEN: usize = PREFIX_LEN + 1;

/// Reply header: prefix plus the fixed 5-group length
pub const HEADER_LEN: usize = PREFIX_LEN + leb128::FIXED_LEN;

/// Decode an envelope and return its payload.
///
/// The length is read as a full LEB128 integer starting at offset 7, so
/// payloads of any size are located correctly. Bytes after the payload are
/// ignored.
pub fn decode(data: &[u8]) -> Result<&[u8], EnvelopeError> {
    // Check minimum envelope size
    if data.len() < MIN_ENVELOPE_LEN {
        return Err(EnvelopeError::Truncated {
            needed: MIN_ENVELOPE_LEN,
            available: data.len(),
        });
    }

    let mut found = [0u8; 4];
    found.copy_from_slice(&data[..MAGIC.len()]);
    if found != MAGIC {
        return Err(EnvelopeError::BadMagic { found });
    }

    let mut table = [0u8; 3];
    table.copy_from_slice(&data[MAGIC.len()..PREFIX_LEN]);
    if table != TYPE_TABLE {
        return Err(EnvelopeError::UnsupportedTypeTable { found: table });
    }

    let (declared, used) = leb128::decode(&data[PREFIX_LEN..]).map_err(|e| match e {
        EnvelopeError::Truncated { needed, available } => EnvelopeError::Truncated {
            needed: PREFIX_LEN + needed,
            available: PREFIX_LEN + available,
        },
        other => other,
    })?;

    let start = PREFIX_LEN + used;
    let available = data.len() - start;
    let length = usize::try_from(declared).unwrap_or(usize::MAX);
    if length > available {
        return Err(EnvelopeError::Truncated {
            needed: start.saturating_add(length),
            available: data.len(),
        });
    }

    Ok(&data[start..start + length])
}

/// Build the 12-byte reply header for a payload of `payload_len` bytes.
///
/// Capacity discipline is the caller's: `payload_len` is not checked
/// against the bytes actually following the header.
pub const fn encode_header(payload_len: u32) -> [u8; HEADER_LEN] {
    let len = leb128::fixed5(payload_len);
    [
        MAGIC[0],
        MAGIC[1],
        MAGIC[2],
        MAGIC[3],
        TYPE_TABLE[0],
        TYPE_TABLE[1],
        TYPE_TABLE[2],
        len[0],
        len[1],
        len[2],
        len[3],
        len[4],
    ]
}
