//! Runtime error types

use shim_arena::ArenaError;
use shim_blob::BlobError;
use shim_envelope::EnvelopeError;
use shim_primitives::MemoryError;

/// Failures of the host primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Linear memory could not be grown or claimed.
    #[error("linear memory: {0}")]
    Memory(MemoryError),

    /// The argument copy window lies outside the incoming message.
    #[error("argument copy out of range: {len} bytes at offset {offset}, message is {size} bytes")]
    ArgumentOutOfRange {
        offset: usize,
        len: usize,
        size: usize,
    },
}

impl From<MemoryError> for HostError {
    fn from(err: MemoryError) -> Self {
        HostError::Memory(err)
    }
}

/// Everything that can end a call. All of them are fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("envelope: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("arena: {0}")]
    Arena(#[from] ArenaError),

    #[error("blob: {0}")]
    Blob(#[from] BlobError),

    #[error("host: {0}")]
    Host(#[from] HostError),

    /// The incoming message does not fit in the staging buffer.
    #[error("incoming message too large: {size} bytes, staging holds {capacity}")]
    IncomingTooLarge { size: usize, capacity: usize },
}

/// Coarse classification of a [`RuntimeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input shorter than its header or declared length
    TruncatedEnvelope,
    /// Magic, type table or length encoding is wrong
    MalformedEnvelope,
    /// Arena, staging, scratch or blob bounds overrun
    CapacityExceeded,
    /// A host primitive failed
    Host,
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::Envelope(e) if e.is_truncated() => ErrorKind::TruncatedEnvelope,
            RuntimeError::Envelope(_) => ErrorKind::MalformedEnvelope,
            RuntimeError::Arena(_) | RuntimeError::Blob(_) | RuntimeError::IncomingTooLarge { .. } => {
                ErrorKind::CapacityExceeded
            }
            RuntimeError::Host(_) => ErrorKind::Host,
        }
    }
}
