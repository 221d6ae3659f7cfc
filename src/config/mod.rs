//! Configuration for the binding.
//!
//! The library never reads files on its own; the binary loads a
//! [`ShimConfig`] with [`ShimConfig::load`] and builds a binding from it.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ShimConfig, SplitterConfig};
