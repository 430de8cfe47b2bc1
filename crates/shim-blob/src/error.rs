//! Error types for blob I/O.

/// Errors from virtual file operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BlobError {
    /// A read, write or seek would move the cursor past the end of a blob.
    #[error("out of bounds: requested {requested} bytes, {available} available")]
    OutOfBounds { requested: usize, available: usize },

    /// The reply scratch buffer is full.
    #[error("output capacity exceeded: requested {requested} bytes, {remaining} remaining")]
    CapacityExceeded { requested: usize, remaining: usize },

    /// A caller-provided buffer cannot hold the result and its terminator.
    #[error("destination too small: need {needed} bytes, capacity {capacity}")]
    DestinationTooSmall { needed: usize, capacity: usize },

    /// The reply payload does not fit the 32-bit length field.
    #[error("payload too large for envelope: {len} bytes")]
    PayloadTooLarge { len: usize },
}
