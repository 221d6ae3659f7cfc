//! Command string → tokens.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest argument vector handed to the entry point, program slot included.
pub const DEFAULT_MAX_ARGS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unterminated quote opened at byte {offset}")]
    UnterminatedQuote { offset: usize },

    #[error("too many arguments: {found} exceeds the limit of {limit}")]
    TooManyTokens { limit: usize, found: usize },

    #[error("malformed command string: unbalanced quote or trailing escape")]
    Malformed,

    #[error("argument limit must be at least 1")]
    InvalidLimit,

    #[error("out of memory while splitting the command string")]
    OutOfMemory,
}

impl From<std::collections::TryReserveError> for TokenizeError {
    fn from(_: std::collections::TryReserveError) -> Self {
        TokenizeError::OutOfMemory
    }
}

/// Quoting rules used to split a command string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grammar {
    /// Whitespace-delimited words, `"` groups. No escapes.
    #[default]
    DoubleQuote,
    /// POSIX shell words: single quotes, double quotes, backslash escapes.
    Posix,
}

/// What a `"` without a partner means under [`Grammar::DoubleQuote`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnterminatedQuote {
    #[default]
    Reject,
    /// The quoted run swallows the rest of the input.
    ExtendToEnd,
}

/// Splits command strings into argument tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splitter {
    max_args: usize,
    grammar: Grammar,
    unterminated: UnterminatedQuote,
}

impl Splitter {
    /// Splitter with a custom token bound. Zero is rejected.
    pub fn with_max_args(max_args: usize) -> Result<Self, TokenizeError> {
        if max_args == 0 {
            return Err(TokenizeError::InvalidLimit);
        }
        Ok(Self {
            max_args,
            ..Self::default()
        })
    }

    pub fn grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn unterminated(mut self, policy: UnterminatedQuote) -> Self {
        self.unterminated = policy;
        self
    }

    pub fn max_args(&self) -> usize {
        self.max_args
    }

    /// Split `text`, keeping at most `max_args` tokens.
    ///
    /// Extra tokens are dropped with a warning rather than reported as an
    /// error; use [`split_checked`](Self::split_checked) to refuse instead.
    pub fn split(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        let mut tokens = self.split_unbounded(text)?;
        if tokens.len() > self.max_args {
            tracing::warn!(
                limit = self.max_args,
                dropped = tokens.len() - self.max_args,
                "argument list truncated"
            );
            tokens.truncate(self.max_args);
        }
        Ok(tokens)
    }

    /// Split `text`, failing when it holds more than `max_args` tokens.
    pub fn split_checked(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        let tokens = self.split_unbounded(text)?;
        if tokens.len() > self.max_args {
            return Err(TokenizeError::TooManyTokens {
                limit: self.max_args,
                found: tokens.len(),
            });
        }
        Ok(tokens)
    }

    fn split_unbounded(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        match self.grammar {
            Grammar::DoubleQuote => self.split_double_quote(text),
            Grammar::Posix => {
                let mut tokens = shlex::split(text).ok_or(TokenizeError::Malformed)?;
                for token in &mut tokens {
                    token.try_reserve_exact(1)?;
                }
                Ok(tokens)
            }
        }
    }

    /// Every buffer grows through `try_reserve`, and each finished token
    /// keeps one spare byte so the NUL terminator fits without reallocating.
    fn split_double_quote(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        let mut tokens: Vec<String> = Vec::new();
        let mut current = String::new();
        // A token may be empty (`""`), so track whether one is open.
        let mut in_token = false;
        let mut open_quote: Option<usize> = None;

        for (offset, ch) in text.char_indices() {
            match ch {
                '"' => {
                    open_quote = match open_quote {
                        Some(_) => None,
                        None => Some(offset),
                    };
                    in_token = true;
                }
                c if open_quote.is_none() && is_delimiter(c) => {
                    if in_token {
                        finish_token(&mut tokens, std::mem::take(&mut current))?;
                        in_token = false;
                    }
                }
                c => {
                    current.try_reserve(c.len_utf8())?;
                    current.push(c);
                    in_token = true;
                }
            }
        }

        if let Some(offset) = open_quote {
            if self.unterminated == UnterminatedQuote::Reject {
                return Err(TokenizeError::UnterminatedQuote { offset });
            }
        }
        if in_token {
            finish_token(&mut tokens, current)?;
        }
        Ok(tokens)
    }
}

fn finish_token(tokens: &mut Vec<String>, mut token: String) -> Result<(), TokenizeError> {
    token.try_reserve_exact(1)?;
    tokens.try_reserve(1)?;
    tokens.push(token);
    Ok(())
}

impl Default for Splitter {
    fn default() -> Self {
        Self {
            max_args: DEFAULT_MAX_ARGS,
            grammar: Grammar::default(),
            unterminated: UnterminatedQuote::default(),
        }
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Split with the default splitter.
pub fn tokenize(text: &str) -> Result<Vec<String>, TokenizeError> {
    Splitter::default().split(text)
}
