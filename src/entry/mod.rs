//! Providers of the wrapped tool's `(argc, argv) -> int` entry point.
//!
//! - [`FnEntry`] calls a function pointer already linked into the process.
//! - [`SharedLibrary`] loads `libwgrib*.so` at run time and resolves the
//!   entry symbol (Unix only).
//! - [`ProcessEntry`] runs the tool's executable in a child process, so
//!   hidden static state in the tool cannot leak between calls.

#[cfg(unix)]
mod library;
mod process;

use std::ffi::{c_char, c_int};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::args::ArgVector;
use crate::config::ShimConfig;
use crate::error::ShimError;

#[cfg(unix)]
pub use library::SharedLibrary;
pub use process::ProcessEntry;

/// C signature of the wrapped tool's main routine.
pub type MainFn = unsafe extern "C" fn(c_int, *mut *mut c_char) -> c_int;

/// Output of a call whose stdout and stderr were collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// The wrapped tool, seen as an opaque capability.
pub trait EntryPoint: Send + Sync {
    /// Name used for the program slot when the caller supplies none.
    fn name(&self) -> &str;

    /// Forward `argv` and return the tool's status unchanged.
    fn invoke(&self, argv: &mut ArgVector) -> Result<i32, ShimError>;

    /// Whether each call runs outside this process.
    ///
    /// In-process calls share the tool's static state and are serialized.
    fn isolated(&self) -> bool {
        false
    }

    fn capture(&self, _argv: &mut ArgVector) -> Result<Captured, ShimError> {
        Err(ShimError::CaptureUnsupported(self.name().to_string()))
    }
}

/// Entry point backed by a function pointer.
pub struct FnEntry {
    name: String,
    main: MainFn,
}

impl FnEntry {
    /// # Safety
    ///
    /// `main` must follow the C `main` contract: read at most `argc`
    /// entries of a null-terminated `argv` and not free or retain them.
    pub unsafe fn new(name: impl Into<String>, main: MainFn) -> Self {
        Self {
            name: name.into(),
            main,
        }
    }
}

impl EntryPoint for FnEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, argv: &mut ArgVector) -> Result<i32, ShimError> {
        // SAFETY: the constructor's contract; argv outlives the call.
        let status = unsafe { (self.main)(argv.argc(), argv.as_mut_ptr()) };
        Ok(status)
    }
}

/// Which GRIB tool is being wrapped.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Wgrib,
    #[default]
    Wgrib2,
}

impl Tool {
    /// Exported entry symbol; the tool's `main` renamed at build time.
    pub fn symbol(self) -> &'static str {
        match self {
            Tool::Wgrib => "wgrib",
            Tool::Wgrib2 => "wgrib2",
        }
    }

    /// Platform file name of the shared library, e.g. `libwgrib2.so`.
    pub fn library_file_name(self) -> String {
        format!(
            "{}{}{}",
            std::env::consts::DLL_PREFIX,
            self.symbol(),
            std::env::consts::DLL_SUFFIX
        )
    }

    pub fn executable_name(self) -> String {
        format!("{}{}", self.symbol(), std::env::consts::EXE_SUFFIX)
    }
}

/// Open the entry point described by `config`.
///
/// `isolate` selects the executable; otherwise the shared library is loaded.
/// Without `dlopen` (non-Unix) the executable is always used.
pub fn open(config: &ShimConfig) -> Result<Box<dyn EntryPoint>, ShimError> {
    let tool = config.tool;

    #[cfg(unix)]
    if !config.isolate {
        let path = config
            .library
            .clone()
            .unwrap_or_else(|| PathBuf::from(tool.library_file_name()));
        tracing::debug!(library = %path.display(), symbol = tool.symbol(), "loading entry point");
        return Ok(Box::new(SharedLibrary::open(&path, tool)?));
    }

    let program = config
        .executable
        .clone()
        .unwrap_or_else(|| PathBuf::from(tool.executable_name()));
    tracing::debug!(program = %program.display(), "using isolated entry point");
    Ok(Box::new(ProcessEntry::new(tool.symbol(), program)))
}
