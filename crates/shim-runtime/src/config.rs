//! Runtime configuration
//!
//! The host provides no files or environment, so configuration is a value
//! fixed at compile time and handed to the entry macros.

use shim_primitives::WASM_PAGE_SIZE;

/// Sizes of everything the dispatcher carves out on its first call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Linear memory the module must have before the arena is built
    pub operating_pages: usize,
    /// Size of the `data` blob
    pub data_blob_len: usize,
    /// Size of the `save` blob
    pub save_blob_len: usize,
    /// Largest incoming envelope (header included)
    pub input_capacity: usize,
    /// Reply scratch size (header included)
    pub output_capacity: usize,
}

impl RuntimeConfig {
    /// 10 pages, 64 KiB blobs, 2 KiB staging and scratch buffers.
    pub const DEFAULT: Self = Self {
        operating_pages: 10,
        data_blob_len: 64 * 1024,
        save_blob_len: 64 * 1024,
        input_capacity: 2048,
        output_capacity: 2048,
    };

    pub const fn with_operating_pages(self, operating_pages: usize) -> Self {
        Self {
            operating_pages,
            ..self
        }
    }

    pub const fn with_data_blob_len(self, data_blob_len: usize) -> Self {
        Self {
            data_blob_len,
            ..self
        }
    }

    pub const fn with_save_blob_len(self, save_blob_len: usize) -> Self {
        Self {
            save_blob_len,
            ..self
        }
    }

    pub const fn with_input_capacity(self, input_capacity: usize) -> Self {
        Self {
            input_capacity,
            ..self
        }
    }

    pub const fn with_output_capacity(self, output_capacity: usize) -> Self {
        Self {
            output_capacity,
            ..self
        }
    }

    /// Bytes the arena hands out at initialization.
    ///
    /// Saturates, so an absurd configuration surfaces as an arena
    /// `CapacityExceeded` instead of wrapping.
    pub const fn reserved_bytes(&self) -> usize {
        self.data_blob_len
            .saturating_add(self.save_blob_len)
            .saturating_add(self.input_capacity)
            .saturating_add(self.output_capacity)
    }

    /// Upper bound on linear memory after growth.
    pub const fn operating_bytes(&self) -> usize {
        self.operating_pages.saturating_mul(WASM_PAGE_SIZE)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
