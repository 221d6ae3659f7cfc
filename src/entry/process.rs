//! Out-of-process entry point: the tool's executable, spawned per call.
//!
//! Slower than the shared library, but every call starts from clean tool
//! state and stdout/stderr can be captured.

use std::ffi::{CStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{Captured, EntryPoint};
use crate::args::ArgVector;
use crate::error::ShimError;
use crate::shell::exit_code;

/// Runs the tool's executable once per call.
///
/// `argv[0]` becomes the child's program name; the rest are its arguments.
pub struct ProcessEntry {
    name: String,
    program: PathBuf,
}

impl ProcessEntry {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, argv: &ArgVector) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(argv.rest().map(os_arg));
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(os_arg(argv.program()));
        }
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> ShimError {
        ShimError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

impl EntryPoint for ProcessEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, argv: &mut ArgVector) -> Result<i32, ShimError> {
        let status = self
            .command(argv)
            .status()
            .map_err(|e| self.spawn_error(e))?;
        Ok(exit_code(status))
    }

    fn isolated(&self) -> bool {
        true
    }

    fn capture(&self, argv: &mut ArgVector) -> Result<Captured, ShimError> {
        let output = self
            .command(argv)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        Ok(Captured {
            status: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(unix)]
fn os_arg(arg: &CStr) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    std::ffi::OsStr::from_bytes(arg.to_bytes()).to_owned()
}

#[cfg(not(unix))]
fn os_arg(arg: &CStr) -> OsString {
    OsString::from(arg.to_string_lossy().into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn forwards_arguments_after_program_slot() {
        let entry = ProcessEntry::new("sh", "sh");
        let mut argv = ArgVector::from_tokens(
            "sh",
            vec![
                "sh".into(),
                "-c".into(),
                "echo \"$1\"; exit 4".into(),
                "inner".into(),
                "x y".into(),
            ],
        )
        .unwrap();

        let captured = entry.capture(&mut argv).unwrap();
        assert_eq!(captured.status, 4);
        assert_eq!(captured.stdout, "x y\n");
        assert!(captured.stderr.is_empty());
    }

    #[test]
    fn missing_executable_is_spawn_error() {
        let entry = ProcessEntry::new("wgrib2", "/nonexistent/wgrib2");
        let mut argv = ArgVector::new("wgrib2", Vec::new()).unwrap();
        assert!(matches!(entry.invoke(&mut argv), Err(ShimError::Spawn { .. })));
    }
}
