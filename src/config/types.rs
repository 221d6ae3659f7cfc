//! Serde shapes of the config file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::args::{Grammar, UnterminatedQuote, DEFAULT_MAX_ARGS};
use crate::binding::CallStyle;
use crate::entry::Tool;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
    /// Which tool is wrapped.
    pub tool: Tool,
    /// Shared library holding the entry point (default: `lib<tool>.so` on
    /// the loader search path).
    pub library: Option<PathBuf>,
    /// Executable used for isolated calls (default: `<tool>` on `PATH`).
    pub executable: Option<PathBuf>,
    /// Run every call in a fresh child process.
    pub isolate: bool,
    pub call_style: CallStyle,
    pub splitter: SplitterConfig,
}

/// Tokenizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    pub max_args: usize,
    pub grammar: Grammar,
    pub unterminated_quote: UnterminatedQuote,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            max_args: DEFAULT_MAX_ARGS,
            grammar: Grammar::default(),
            unterminated_quote: UnterminatedQuote::default(),
        }
    }
}
