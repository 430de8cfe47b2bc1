//! canister-shim Blob I/O
//!
//! Conventional sequential file operations mapped onto cursors into
//! preloaded in-memory byte regions, so text-I/O style program logic runs
//! without a filesystem:
//!
//! - **Traits**: `ByteSource` / `ByteSink`, the capability interface program
//!   logic is written against
//! - **Blob**: read-write virtual file over a fixed region (`data`, `save`)
//! - **ReadCursor**: read-only stream (request payload, static text)
//! - **OutputBuffer**: append-only reply scratch with a reserved header
//! - **mem**: libc-shaped buffer helpers (fill, copy, move, search, length)
//!
//! Every cursor move is bounds-checked; running off the end of a region is
//! an error, never a write into a neighbour.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod blob;
pub mod cursor;
pub mod error;
pub mod io;
pub mod mem;
pub mod output;

// Convenient re-exports at crate root
pub use blob::Blob;
pub use cursor::ReadCursor;
pub use error::BlobError;
pub use io::{ByteSink, ByteSource};
pub use output::OutputBuffer;
