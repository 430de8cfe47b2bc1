//! Safe wrappers for the `ic0` host imports
//!
//! The host exposes a handful of raw functions for reading the incoming
//! argument, building the reply and printing diagnostics. The unsafe
//! declarations are isolated here; the public API takes and returns slices.
//!
//! On non-wasm targets every wrapper is an inert mock so the rest of the
//! workspace can be unit tested natively.

// ============================================================================
// FFI Declarations (unsafe)
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[link(wasm_import_module = "ic0")]
extern "C" {
    /// Size in bytes of the incoming argument blob.
    fn msg_arg_data_size() -> u32;

    /// Copy `size` bytes of the argument, starting at `offset`, to `dst`.
    ///
    /// # Safety
    /// - `dst` must be writable for `size` bytes
    /// - `offset + size` must not exceed `msg_arg_data_size()`
    fn msg_arg_data_copy(dst: *mut u8, offset: u32, size: u32);

    /// Append `size` bytes at `src` to the pending reply.
    ///
    /// # Safety
    /// - `src` must be readable for `size` bytes
    fn msg_reply_data_append(src: *const u8, size: u32);

    /// Send the pending reply. Must be called at most once per message.
    fn msg_reply();

    /// Print `size` bytes at `src` to the host's debug log.
    ///
    /// # Safety
    /// - `src` must be readable for `size` bytes
    fn debug_print(src: *const u8, size: u32);
}

// ============================================================================
// Safe Wrappers
// ============================================================================

/// Size of the incoming argument in bytes.
pub fn arg_data_size() -> usize {
    #[cfg(target_arch = "wasm32")]
    // SAFETY: No parameters, no memory access.
    unsafe {
        msg_arg_data_size() as usize
    }

    #[cfg(not(target_arch = "wasm32"))]
    0 // Mock for non-WASM
}

/// Copy `dst.len()` bytes of the incoming argument starting at `offset`.
///
/// Returns `false` without touching the host when the requested window lies
/// outside the argument, which the host would otherwise punish with a trap.
#[cfg(target_arch = "wasm32")]
pub fn arg_data_copy(dst: &mut [u8], offset: usize) -> bool {
    let size = arg_data_size();
    match offset.checked_add(dst.len()) {
        Some(end) if end <= size => {}
        _ => return false,
    }
    if dst.is_empty() {
        return true;
    }
    // SAFETY: `dst` is an exclusively borrowed slice of exactly `dst.len()`
    // bytes and the window was checked against the argument size above.
    unsafe {
        msg_arg_data_copy(dst.as_mut_ptr(), offset as u32, dst.len() as u32);
    }
    true
}

#[cfg(not(target_arch = "wasm32"))]
pub fn arg_data_copy(dst: &mut [u8], offset: usize) -> bool {
    // The mock argument is always empty.
    offset == 0 && dst.is_empty()
}

/// Append bytes to the pending reply.
#[cfg(target_arch = "wasm32")]
pub fn reply_data_append(data: &[u8]) {
    if data.is_empty() {
        return;
    }
    // SAFETY: We pass a valid slice pointer and its exact length.
    // The slice is borrowed for the duration of this call.
    unsafe {
        msg_reply_data_append(data.as_ptr(), data.len() as u32);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn reply_data_append(_data: &[u8]) {
    // No-op for non-WASM
}

/// Send the pending reply.
pub fn reply() {
    #[cfg(target_arch = "wasm32")]
    // SAFETY: No parameters, no memory access.
    unsafe {
        msg_reply();
    }
}

/// Print a diagnostic line to the host's debug log.
#[cfg(target_arch = "wasm32")]
pub fn debug(msg: &[u8]) {
    // SAFETY: We pass a valid slice pointer and its exact length.
    unsafe {
        debug_print(msg.as_ptr(), msg.len() as u32);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn debug(_msg: &[u8]) {
    // No-op for non-WASM
}

// ============================================================================
// Tests
// ============================================================================
