//! Argument marshaling for the wrapped tool.
//!
//! ```text
//! Command string → Splitter → tokens ─┐
//!                                     ├→ ArgVector (char **) → entry point
//! Host values   → to_native ─────────┘
//! ```
//!
//! Each stage is a pure function that can be unit-tested independently.

mod argv;
mod host;
mod tokenizer;

pub use argv::ArgVector;
pub use host::HostValue;
pub use tokenizer::{
    tokenize, Grammar, Splitter, TokenizeError, UnterminatedQuote, DEFAULT_MAX_ARGS,
};
