//! Host call surface: `main(...)` and `system_call(command)`.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::args::{ArgVector, HostValue, Splitter, TokenizeError};
use crate::config::ShimConfig;
use crate::entry::{self, Captured, EntryPoint};
use crate::error::ShimError;
use crate::shell;

/// Serializes every in-process call: the wrapped tools keep static state
/// and are not reentrant.
static ENTRY_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// How `main` interprets its call-site values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStyle {
    /// One string, split into arguments.
    #[default]
    CommandString,
    /// Every value is one argument, forwarded as-is.
    Variadic,
}

/// The wrapped tool bound to a host.
pub struct Binding {
    entry: Box<dyn EntryPoint>,
    splitter: Splitter,
    style: CallStyle,
}

impl Binding {
    pub fn new(entry: Box<dyn EntryPoint>) -> Self {
        Self {
            entry,
            splitter: Splitter::default(),
            style: CallStyle::default(),
        }
    }

    /// Open the configured entry point and apply the splitter settings.
    pub fn from_config(config: &ShimConfig) -> Result<Self, ShimError> {
        let splitter = config.splitter.build()?;
        let entry = entry::open(config)?;
        Ok(Self::new(entry)
            .with_splitter(splitter)
            .with_call_style(config.call_style))
    }

    pub fn with_splitter(mut self, splitter: Splitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn with_call_style(mut self, style: CallStyle) -> Self {
        self.style = style;
        self
    }

    pub fn call_style(&self) -> CallStyle {
        self.style
    }

    pub fn entry(&self) -> &dyn EntryPoint {
        self.entry.as_ref()
    }

    /// `main(command_string_or_args...) -> int`
    pub fn main(&self, args: &[HostValue]) -> Result<i32, ShimError> {
        let mut argv = self.build_argv(args)?;
        self.call(&mut argv)
    }

    /// Split `command` and forward the tokens.
    pub fn run_command(&self, command: &str) -> Result<i32, ShimError> {
        let mut argv = self.command_argv(command)?;
        self.call(&mut argv)
    }

    /// Forward `args` one-to-one.
    pub fn run_args(&self, args: &[HostValue]) -> Result<i32, ShimError> {
        let mut argv = self.variadic_argv(args)?;
        self.call(&mut argv)
    }

    /// Like [`main`](Self::main), but returns the tool's stdout and stderr.
    ///
    /// Only entry points that run out of process can capture.
    pub fn check_output(&self, args: &[HostValue]) -> Result<Captured, ShimError> {
        let mut argv = self.build_argv(args)?;
        let captured = self.call_locked(&mut argv, |entry, argv| entry.capture(argv))?;
        tracing::info!(entry = self.entry.name(), status = captured.status, "output captured");
        Ok(captured)
    }

    /// `system_call(command_string) -> int`
    pub fn system_call(&self, command: &str) -> Result<i32, ShimError> {
        shell::system_call(command)
    }

    fn build_argv(&self, args: &[HostValue]) -> Result<ArgVector, ShimError> {
        match self.style {
            CallStyle::CommandString => {
                let [value] = args else {
                    return Err(ShimError::Arity {
                        expected: 1,
                        got: args.len(),
                    });
                };
                self.command_argv(value.as_text(0)?)
            }
            CallStyle::Variadic => self.variadic_argv(args),
        }
    }

    fn command_argv(&self, command: &str) -> Result<ArgVector, ShimError> {
        let tokens = self.splitter.split(command)?;
        ArgVector::from_tokens(self.entry.name(), tokens)
    }

    fn variadic_argv(&self, args: &[HostValue]) -> Result<ArgVector, ShimError> {
        // The host chose every argument explicitly, so overflow is an error
        // rather than a silent truncation.
        if args.len() > self.splitter.max_args() {
            return Err(TokenizeError::TooManyTokens {
                limit: self.splitter.max_args(),
                found: args.len(),
            }
            .into());
        }

        let mut native = Vec::new();
        native.try_reserve_exact(args.len())?;
        for (index, value) in args.iter().enumerate() {
            native.push(value.to_native(index)?);
        }
        ArgVector::new(self.entry.name(), native)
    }

    fn call(&self, argv: &mut ArgVector) -> Result<i32, ShimError> {
        let status = self.call_locked(argv, |entry, argv| entry.invoke(argv))?;
        tracing::info!(entry = self.entry.name(), status, "entry point returned");
        Ok(status)
    }

    fn call_locked<T>(
        &self,
        argv: &mut ArgVector,
        f: impl FnOnce(&dyn EntryPoint, &mut ArgVector) -> Result<T, ShimError>,
    ) -> Result<T, ShimError> {
        let entry = self.entry.as_ref();
        tracing::debug!(
            entry = entry.name(),
            argc = argv.argc(),
            isolated = entry.isolated(),
            "forwarding to entry point"
        );

        if entry.isolated() {
            return f(entry, argv);
        }
        let _guard = ENTRY_LOCK.lock();
        f(entry, argv)
    }
}
