//! Error taxonomy for the binding layer.
//!
//! Statuses returned by the wrapped tool are plain integers and never show
//! up here; these errors only cover what happens before or around the call.

use std::path::PathBuf;

use thiserror::Error;

use crate::args::TokenizeError;
use crate::config::ConfigError;

/// Errors surfaced to the host by [`Binding`](crate::binding::Binding).
#[derive(Debug, Error)]
pub enum ShimError {
    /// A call-site value was not a string.
    #[error("argument {index}: expected str or bytes, found {found}")]
    Type { index: usize, found: String },

    /// Wrong number of call-site values for the binding's call style.
    #[error("expected {expected} argument(s), got {got}")]
    Arity { expected: usize, got: usize },

    /// A string carried a NUL byte and cannot cross into C.
    #[error("argument {index}: embedded NUL byte")]
    InteriorNul { index: usize },

    #[error("out of memory while building the argument vector")]
    OutOfMemory,

    #[error(transparent)]
    Tokenize(TokenizeError),

    /// The shared library could not be opened or lacks the entry symbol.
    #[error("failed to load '{path}': {message}")]
    Library { path: PathBuf, message: String },

    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("entry point '{0}' runs in-process and cannot capture output")]
    CaptureUnsupported(String),
}

impl From<TokenizeError> for ShimError {
    fn from(err: TokenizeError) -> Self {
        match err {
            TokenizeError::OutOfMemory => ShimError::OutOfMemory,
            other => ShimError::Tokenize(other),
        }
    }
}

impl From<std::collections::TryReserveError> for ShimError {
    fn from(_: std::collections::TryReserveError) -> Self {
        ShimError::OutOfMemory
    }
}
