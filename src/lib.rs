//! Binding layer for the `wgrib` / `wgrib2` GRIB command-line tools.
//!
//! The tools are reached through their C entry point,
//! `int wgrib2(int argc, char **argv)`. This crate only marshals arguments
//! into that call: it splits command strings, converts host values into
//! native strings, and forwards the resulting `argv`. It never looks at
//! GRIB data itself.
//!
//! ```no_run
//! use wgrib_shim::{Binding, ShimConfig};
//!
//! let binding = Binding::from_config(&ShimConfig::default())?;
//! let status = binding.run_command(r#"wgrib2 gfs.grb2 -match ":TMP:" -csv "out file.csv""#)?;
//! println!("wgrib2 exited with {status}");
//! # Ok::<(), wgrib_shim::ShimError>(())
//! ```

pub mod args;
pub mod binding;
pub mod config;
pub mod entry;
pub mod error;
pub mod logging;
pub mod shell;

pub use args::{tokenize, ArgVector, HostValue, Splitter};
pub use binding::{Binding, CallStyle};
pub use config::ShimConfig;
pub use entry::{Captured, EntryPoint, FnEntry, ProcessEntry, Tool};
pub use error::ShimError;
pub use shell::system_call;
