//! Envelope Errors
//!
//! Failures while parsing an incoming envelope or encoding a length.

/// Errors that can occur while decoding or encoding an envelope.
///
/// These errors indicate a malformed request from the host; the dispatcher
/// treats every one of them as fatal for the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    /// Input ends before a complete header, length or payload.
    #[error("truncated envelope: need {needed} bytes, only {available} available")]
    Truncated { needed: usize, available: usize },

    /// The 4-byte magic tag is not `"DIDL"`.
    #[error("malformed envelope: bad magic {found:02x?}")]
    BadMagic { found: [u8; 4] },

    /// The type table does not describe exactly one text value.
    #[error("malformed envelope: unsupported type table {found:02x?}")]
    UnsupportedTypeTable { found: [u8; 3] },

    /// The length does not fit the target width.
    #[error("length overflow: value needs more than {max_bits} bits")]
    LengthOverflow { max_bits: u32 },
}

impl EnvelopeError {
    /// Whether the input was cut short (`TruncatedEnvelope`).
    pub fn is_truncated(&self) -> bool {
        matches!(self, EnvelopeError::Truncated { .. })
    }

    /// Whether the input is structurally wrong (`MalformedEnvelope`).
    pub fn is_malformed(&self) -> bool {
        !self.is_truncated()
    }
}
