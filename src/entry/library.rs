//! In-process entry point: the tool built as a shared library.
//!
//! `libwgrib2.so` (or `libwgrib.so`) exports its command-line `main` under
//! the tool's name. Resolution happens once, at open; each call then jumps
//! straight into the library with the caller's `argv`.

use std::ffi::{c_void, CStr, CString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use super::{EntryPoint, MainFn, Tool};
use crate::args::ArgVector;
use crate::error::ShimError;

/// The tool's entry point resolved from a shared library with `dlopen`.
///
/// The library stays loaded until this value is dropped.
pub struct SharedLibrary {
    path: PathBuf,
    symbol: String,
    handle: *mut c_void,
    main: MainFn,
}

// The handle is only used to dlclose on drop; dlsym results are plain code
// pointers. Concurrent calls into the tool are serialized by the binding.
unsafe impl Send for SharedLibrary {}
unsafe impl Sync for SharedLibrary {}

impl SharedLibrary {
    /// Load `path` and resolve the symbol named after `tool`.
    ///
    /// A bare file name is searched the way the dynamic loader searches
    /// (`LD_LIBRARY_PATH`, `DYLD_LIBRARY_PATH`, system directories).
    pub fn open(path: &Path, tool: Tool) -> Result<Self, ShimError> {
        // SAFETY: both tools export `main` under their own name.
        unsafe { Self::open_symbol(path, tool.symbol()) }
    }

    /// Load `path` and resolve `symbol`, for builds that export the entry
    /// point under a non-default name.
    ///
    /// # Safety
    ///
    /// `symbol` must be a function with the `int (int, char **)` signature
    /// of a C `main`.
    pub unsafe fn open_symbol(path: &Path, symbol: &str) -> Result<Self, ShimError> {
        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| ShimError::Library {
            path: path.to_owned(),
            message: "path contains a NUL byte".to_string(),
        })?;
        let c_symbol = CString::new(symbol).map_err(|_| ShimError::Library {
            path: path.to_owned(),
            message: "symbol contains a NUL byte".to_string(),
        })?;

        // SAFETY: c_path is a valid C string for the duration of the call.
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        if handle.is_null() {
            return Err(ShimError::Library {
                path: path.to_owned(),
                message: last_dl_error(),
            });
        }

        // SAFETY: handle is a live dlopen handle.
        let address = unsafe { libc::dlsym(handle, c_symbol.as_ptr()) };
        if address.is_null() {
            let message = format!("symbol '{symbol}' not found: {}", last_dl_error());
            // SAFETY: handle came from dlopen and is not used again.
            unsafe { libc::dlclose(handle) };
            return Err(ShimError::Library {
                path: path.to_owned(),
                message,
            });
        }

        // SAFETY: guaranteed by the caller.
        let main = unsafe { std::mem::transmute::<*mut c_void, MainFn>(address) };

        tracing::debug!(path = %path.display(), symbol, "shared library loaded");
        Ok(Self {
            path: path.to_owned(),
            symbol: symbol.to_owned(),
            handle,
            main,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntryPoint for SharedLibrary {
    fn name(&self) -> &str {
        &self.symbol
    }

    fn invoke(&self, argv: &mut ArgVector) -> Result<i32, ShimError> {
        // SAFETY: main was resolved from a library that is still loaded;
        // argv is null-terminated and outlives the call.
        Ok(unsafe { (self.main)(argv.argc(), argv.as_mut_ptr()) })
    }
}

impl Drop for SharedLibrary {
    fn drop(&mut self) {
        // SAFETY: handle came from dlopen and is closed exactly once.
        unsafe { libc::dlclose(self.handle) };
    }
}

fn last_dl_error() -> String {
    // SAFETY: dlerror returns either null or a thread-local C string.
    let message = unsafe { libc::dlerror() };
    if message.is_null() {
        return "unknown dynamic loader error".to_string();
    }
    unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned()
}
