// tests/common/mod.rs

#![allow(dead_code)]

use std::process::{Command, Output, Stdio};

pub use cleanexec_test_utils::builders;
pub use cleanexec_test_utils::init_tracing;
pub use cleanexec_test_utils::platforms;

/// Path of the launcher binary built for this test run.
pub fn cleanexec_bin() -> &'static str {
    env!("CARGO_BIN_EXE_cleanexec")
}

/// A launcher command with a clean logging/config environment.
pub fn cleanexec() -> Command {
    let mut cmd = Command::new(cleanexec_bin());
    cmd.env_remove("CLEANEXEC_LOG")
        .env_remove("CLEANEXEC_CONFIG")
        .stdin(Stdio::null());
    cmd
}

/// Run the launcher with `args` and capture its output.
pub fn run_cleanexec(args: &[&str]) -> Output {
    cleanexec()
        .args(args)
        .output()
        .expect("failed to run cleanexec")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
