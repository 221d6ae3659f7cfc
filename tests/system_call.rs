//! `system_call` returns what the shell itself would report.

#![cfg(unix)]

use std::process::Command;

mod common;

use common::recording_binding;
use wgrib_shim::{system_call, CallStyle};

fn shell_status(command: &str) -> i32 {
    Command::new("sh")
        .arg("-c")
        .arg(format!("{command}; echo $?"))
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().parse().unwrap())
        .unwrap()
}

#[test]
fn matches_direct_shell_invocation() {
    for command in ["true", "false", "(exit 42)", "test -d /"] {
        assert_eq!(
            system_call(command).unwrap(),
            shell_status(command),
            "status mismatch for {command}"
        );
    }
}

#[test]
fn runs_through_a_real_shell() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("out.txt");
    let status = system_call(&format!("echo hi > '{}' && exit 0", marker.display())).unwrap();
    assert_eq!(status, 0);
    assert_eq!(std::fs::read_to_string(marker).unwrap(), "hi\n");
}

#[test]
fn binding_exposes_system_call() {
    let binding = recording_binding(CallStyle::CommandString);
    assert_eq!(binding.system_call("exit 9").unwrap(), 9);
}
