//! Shared test utilities: fake entry points and temp config files.

#![allow(dead_code)]

use std::cell::RefCell;
use std::ffi::{c_char, c_int, CStr};
use std::path::PathBuf;

use tempfile::TempDir;
use wgrib_shim::{Binding, CallStyle, FnEntry};

thread_local! {
    static SEEN: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
    static NULL_TERMINATED: RefCell<bool> = const { RefCell::new(false) };
}

/// Entry point that records its argv and returns `argc`.
///
/// Calls happen on the test's own thread, so a thread-local is enough.
pub unsafe extern "C" fn recording_main(argc: c_int, argv: *mut *mut c_char) -> c_int {
    let mut seen = Vec::new();
    for i in 0..argc as usize {
        let arg = *argv.add(i);
        seen.push(CStr::from_ptr(arg).to_bytes().to_vec());
    }
    let terminated = (*argv.add(argc as usize)).is_null();
    SEEN.with(|s| *s.borrow_mut() = seen);
    NULL_TERMINATED.with(|t| *t.borrow_mut() = terminated);
    argc
}

/// Entry point that fails like a tool given a bad file.
pub unsafe extern "C" fn failing_main(_argc: c_int, _argv: *mut *mut c_char) -> c_int {
    8
}

/// argv seen by the last `recording_main` call on this thread.
pub fn last_argv() -> Vec<String> {
    SEEN.with(|s| {
        s.borrow()
            .iter()
            .map(|a| String::from_utf8_lossy(a).into_owned())
            .collect()
    })
}

pub fn last_argv_bytes() -> Vec<Vec<u8>> {
    SEEN.with(|s| s.borrow().clone())
}

pub fn last_was_null_terminated() -> bool {
    NULL_TERMINATED.with(|t| *t.borrow())
}

pub fn reset() {
    SEEN.with(|s| s.borrow_mut().clear());
    NULL_TERMINATED.with(|t| *t.borrow_mut() = false);
}

pub fn recording_binding(style: CallStyle) -> Binding {
    reset();
    let entry = unsafe { FnEntry::new("wgrib2", recording_main) };
    Binding::new(Box::new(entry)).with_call_style(style)
}

/// Write `content` to a temporary config.toml.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
