//! Allocation failure while marshaling arguments.
//!
//! This binary installs an allocator that refuses any single request above
//! a per-thread ceiling, so a multi-megabyte argument fails to allocate
//! while the harness keeps working. The ceiling is per thread because the
//! test harness runs tests in parallel.

mod common;

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use common::{last_argv, recording_binding};
use wgrib_shim::{CallStyle, HostValue, ShimError};

struct CappedAlloc;

thread_local! {
    static CEILING: Cell<usize> = const { Cell::new(usize::MAX) };
}

fn ceiling() -> usize {
    // try_with: the slot may already be gone while a thread shuts down.
    CEILING.try_with(Cell::get).unwrap_or(usize::MAX)
}

unsafe impl GlobalAlloc for CappedAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if layout.size() > ceiling() {
            return std::ptr::null_mut();
        }
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        if layout.size() > ceiling() {
            return std::ptr::null_mut();
        }
        System.alloc_zeroed(layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if new_size > ceiling() {
            return std::ptr::null_mut();
        }
        System.realloc(ptr, layout, new_size)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static ALLOC: CappedAlloc = CappedAlloc;

const MIB: usize = 1 << 20;

/// Run `f` with allocations on this thread capped at `limit` bytes.
fn with_ceiling<T>(limit: usize, f: impl FnOnce() -> T) -> T {
    CEILING.with(|c| c.set(limit));
    let result = f();
    CEILING.with(|c| c.set(usize::MAX));
    result
}

// ============================================================================
// Command-string style
// ============================================================================

#[test]
fn test_oversized_command_string_is_out_of_memory() {
    let binding = recording_binding(CallStyle::CommandString);
    // Built before the ceiling is set: only the binding's own buffers
    // should hit it.
    let command = HostValue::Str(format!("wgrib2 {}", "x".repeat(2 * MIB)));

    let result = with_ceiling(MIB, || binding.main(std::slice::from_ref(&command)));

    assert!(matches!(result, Err(ShimError::OutOfMemory)), "got {result:?}");
    assert!(last_argv().is_empty());
}

#[test]
fn test_oversized_run_command_is_out_of_memory() {
    let binding = recording_binding(CallStyle::Variadic);
    let command = "y".repeat(2 * MIB);

    let result = with_ceiling(MIB, || binding.run_command(&command));

    assert!(matches!(result, Err(ShimError::OutOfMemory)), "got {result:?}");
}

#[test]
fn test_command_string_under_ceiling_still_forwards() {
    let binding = recording_binding(CallStyle::CommandString);
    let command = HostValue::Str(format!("wgrib2 {}", "x".repeat(64 * 1024)));

    let status = with_ceiling(MIB, || binding.main(std::slice::from_ref(&command))).unwrap();

    assert_eq!(status, 2);
    assert_eq!(last_argv()[1].len(), 64 * 1024);
}

// ============================================================================
// Variadic style
// ============================================================================

#[test]
fn test_oversized_variadic_bytes_are_out_of_memory() {
    let binding = recording_binding(CallStyle::Variadic);
    let values: Vec<HostValue> = vec!["wgrib2".into(), vec![b'z'; 2 * MIB].into()];

    let result = with_ceiling(MIB, || binding.main(&values));

    assert!(matches!(result, Err(ShimError::OutOfMemory)), "got {result:?}");
    assert!(last_argv().is_empty());
}

#[test]
fn test_oversized_run_args_str_is_out_of_memory() {
    let binding = recording_binding(CallStyle::CommandString);
    let values: Vec<HostValue> = vec!["wgrib2".into(), "z".repeat(2 * MIB).into()];

    let result = with_ceiling(MIB, || binding.run_args(&values));

    assert!(matches!(result, Err(ShimError::OutOfMemory)), "got {result:?}");
}
