pub mod constant_rows;
pub mod hello;

use std::ffi::CStr;
use std::sync::atomic::{AtomicBool, Ordering};

use duckdb::ffi;
use duckdb::vtab::{BindInfo, Value};

/// Init state for table functions that produce all their output in a single
/// call.
///
/// The first call to `poll_once` returns true, every later call returns false.
#[derive(Debug, Default)]
pub struct OnceScanState {
    finished: AtomicBool,
}

impl OnceScanState {
    /// Mark the scan as finished, returning whether this call is the one that
    /// should produce output.
    pub fn poll_once(&self) -> bool {
        !self.finished.swap(true, Ordering::Relaxed)
    }
}

/// Read the VARCHAR positional parameter at `idx` during bind.
///
/// Returns None if the argument is NULL.
pub fn varchar_parameter(bind: &BindInfo, idx: u64) -> Option<String> {
    // `Value`'s Display impl can't handle NULL, so take the handle and read it
    // through the C API ourselves.
    //
    // SAFETY: `Value` is a lone `duckdb_value` handle (transmute checks the
    // size). Ownership moves into `OwnedValue` which destroys it on drop.
    let raw = unsafe { std::mem::transmute::<Value, ffi::duckdb_value>(bind.get_parameter(idx)) };
    OwnedValue(raw).to_varchar()
}

/// An owned DuckDB value handle.
#[derive(Debug)]
struct OwnedValue(ffi::duckdb_value);

impl OwnedValue {
    fn to_varchar(&self) -> Option<String> {
        // SAFETY: The handle is valid until drop.
        if unsafe { ffi::duckdb_is_null_value(self.0) } {
            return None;
        }

        // SAFETY: Same as above. The returned string is owned by us and must
        // be freed with `duckdb_free`.
        let ptr = unsafe { ffi::duckdb_get_varchar(self.0) };
        if ptr.is_null() {
            return None;
        }

        // SAFETY: Non-null, nul terminated, and freed only after copying.
        let s = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        unsafe { ffi::duckdb_free(ptr.cast()) };

        Some(s)
    }
}

impl Drop for OwnedValue {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: We own the handle, and it's not used after this.
            unsafe { ffi::duckdb_destroy_value(&mut self.0) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polls_once() {
        let state = OnceScanState::default();
        assert!(state.poll_once());
        assert!(!state.poll_once());
        assert!(!state.poll_once());
    }

    #[test]
    fn owned_value_reads_varchar_and_null() {
        let text = c"duck";
        // SAFETY: Creating values from valid inputs, ownership moves into
        // `OwnedValue`.
        let value = OwnedValue(unsafe { ffi::duckdb_create_varchar(text.as_ptr()) });
        assert_eq!(Some("duck".to_string()), value.to_varchar());

        let null = OwnedValue(unsafe { ffi::duckdb_create_null_value() });
        assert_eq!(None, null.to_varchar());
    }
}
