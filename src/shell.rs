//! Pass-through to the platform command processor.
//!
//! The command string is handed over verbatim. Quoting and injection safety
//! are entirely the caller's problem.

use std::process::{Command, ExitStatus};

use crate::error::ShimError;

#[cfg(unix)]
const SHELL: (&str, &str) = ("sh", "-c");
#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");

/// Run `command` through the shell and return the status it would report.
///
/// Stdio is inherited. A child killed by a signal reports `128 + signal`,
/// the same value `$?` holds in the shell.
pub fn system_call(command: &str) -> Result<i32, ShimError> {
    let (shell, flag) = SHELL;
    tracing::debug!(shell, command, "system call");

    let status = Command::new(shell)
        .arg(flag)
        .arg(command)
        .status()
        .map_err(|source| ShimError::Spawn {
            program: shell.to_string(),
            source,
        })?;

    let code = exit_code(status);
    tracing::debug!(code, "system call finished");
    Ok(code)
}

/// Shell-style status of a finished child.
pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
