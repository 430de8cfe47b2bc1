//! Debug logging
//!
//! There is no allocator to `format!` into, so lines are formatted into a
//! fixed stack buffer and handed to [`Host::debug_log`](crate::Host::debug_log).
//! Anything past the buffer is cut off and the line ends in `...`.

use core::fmt;

/// Capacity of a line emitted by [`shim_debug!`](crate::shim_debug).
pub const LOG_LINE_LEN: usize = 256;

/// Prefix on every runtime diagnostic.
pub const PREFIX: &str = "[shim] ";

const ELLIPSIS: &[u8] = b"...";

/// A bounded, stack-allocated text line.
pub struct LogLine<const N: usize> {
    buf: [u8; N],
    len: usize,
    truncated: bool,
}

impl<const N: usize> LogLine<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            truncated: false,
        }
    }

    /// The formatted bytes, with a trailing `...` if anything was dropped.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    fn mark_truncated(&mut self) {
        if self.truncated {
            return;
        }
        self.truncated = true;
        if N >= ELLIPSIS.len() {
            let start = self.len.min(N - ELLIPSIS.len());
            self.buf[start..start + ELLIPSIS.len()].copy_from_slice(ELLIPSIS);
            self.len = start + ELLIPSIS.len();
        }
    }
}

impl<const N: usize> Default for LogLine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for LogLine<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        let room = N - self.len;
        let bytes = s.as_bytes();
        if bytes.len() <= room {
            self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
            self.len += bytes.len();
        } else {
            self.buf[self.len..].copy_from_slice(&bytes[..room]);
            self.len = N;
            self.mark_truncated();
        }
        // Truncation is not a formatting error; the line is still emitted.
        Ok(())
    }
}

/// Format a diagnostic and send it through a host's debug channel.
///
/// `$host` is a place of a type implementing [`Host`](crate::Host); it is
/// borrowed mutably for the duration of the call.
///
/// ```ignore
/// shim_debug!(self.host, "initialized: data {} bytes", data.len());
/// ```
#[macro_export]
macro_rules! shim_debug {
    ($host:expr, $($arg:tt)*) => {{
        let mut line = $crate::log::LogLine::<{ $crate::log::LOG_LINE_LEN }>::new();
        let _ = ::core::fmt::Write::write_str(&mut line, $crate::log::PREFIX);
        let _ = ::core::fmt::Write::write_fmt(&mut line, format_args!($($arg)*));
        $crate::host::Host::debug_log(&mut $host, line.as_bytes());
    }};
}
