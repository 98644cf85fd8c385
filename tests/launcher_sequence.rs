// tests/launcher_sequence.rs

mod common;
use crate::common::builders::LaunchSettingsBuilder;
use crate::common::init_tracing;
use crate::common::platforms::{leaky_process, LEAKED_FDS};

use std::io;

use cleanexec::errors::{LaunchError, EXIT_NOT_EXECUTABLE, EXIT_NOT_FOUND};
use cleanexec::exec::fds::FdScanMethod;
use cleanexec::exec::{LaunchRequest, LaunchState, Launcher, Outcome};
use cleanexec::sys::mock::{MockCall, MockPlatform};
use cleanexec::types::{FdStrategy, LaunchMode, StdinSource};

fn echo_request() -> LaunchRequest {
    LaunchRequest::new("echo", ["hello", "-n", "--flag"])
}

#[test]
fn test_steps_run_in_order_and_exec_gets_full_argv() {
    init_tracing();
    let platform = leaky_process();
    let mut launcher = Launcher::new(platform.clone(), LaunchSettingsBuilder::new().build());

    let outcome = launcher.launch(&echo_request()).unwrap();

    let calls = platform.calls();
    assert_eq!(calls[0], MockCall::OpenNull);
    assert_eq!(calls[1], MockCall::MoveFd { src: 5, dst: 0 });
    assert_eq!(
        calls.last().unwrap(),
        &MockCall::ReplaceImage(vec![
            "echo".to_string(),
            "hello".to_string(),
            "-n".to_string(),
            "--flag".to_string(),
        ])
    );

    // Every close happens between the stdin redirect and the exec.
    let first_close = calls
        .iter()
        .position(|c| matches!(c, MockCall::Close { .. }))
        .unwrap();
    let last_close = calls
        .iter()
        .rposition(|c| matches!(c, MockCall::Close { .. }))
        .unwrap();
    assert!(first_close > 1);
    assert_eq!(last_close, calls.len() - 3);
    assert_eq!(calls[calls.len() - 2], MockCall::RestoreSignals);

    match outcome {
        Outcome::Replaced(prepared) => {
            assert_eq!(prepared.stdin, StdinSource::DevNull);
            assert_eq!(prepared.fds.method, FdScanMethod::Enumerated);
        }
        other => panic!("expected Replaced, got {:?}", other),
    }
    assert_eq!(launcher.state(), LaunchState::Replaced);
}

#[test]
fn test_only_standard_streams_survive() {
    let platform = leaky_process();
    let mut launcher = Launcher::new(platform.clone(), LaunchSettingsBuilder::new().build());

    launcher.launch(&echo_request()).unwrap();

    assert_eq!(platform.open_fds(), vec![0, 1, 2]);
}

#[test]
fn test_enumeration_closes_fds_beyond_reference_range() {
    let platform = leaky_process();
    let settings = LaunchSettingsBuilder::new()
        .fd_strategy(FdStrategy::Enumerate)
        .build();
    let mut launcher = Launcher::new(platform.clone(), settings);

    let outcome = launcher.launch(&echo_request()).unwrap();

    let Outcome::Replaced(prepared) = outcome else {
        panic!("expected Replaced");
    };
    assert_eq!(prepared.fds.scanned, LEAKED_FDS.len());
    assert_eq!(prepared.fds.closed, LEAKED_FDS.len());
    assert!(!platform.open_fds().contains(&4096));
}

#[test]
fn test_fixed_range_leaves_high_fds_and_ignores_unopened_numbers() {
    let platform = leaky_process();
    let settings = LaunchSettingsBuilder::new()
        .fd_strategy(FdStrategy::Range)
        .max_fd(1023)
        .build();
    let mut launcher = Launcher::new(platform.clone(), settings);

    let outcome = launcher.launch(&echo_request()).unwrap();

    let Outcome::Replaced(prepared) = outcome else {
        panic!("expected Replaced");
    };
    assert_eq!(prepared.fds.method, FdScanMethod::Range { max_fd: 1023 });
    assert_eq!(prepared.fds.scanned, 1021);
    // 3, 4, 7 and 255 were open; the rest of the range was not.
    assert_eq!(prepared.fds.closed, 4);
    assert_eq!(platform.open_fds(), vec![0, 1, 2, 1500, 4096]);
}

#[test]
fn test_stdin_falls_back_to_empty_pipe() {
    let platform = MockPlatform::new().with_null_error(io::ErrorKind::NotFound);
    let mut launcher = Launcher::new(platform.clone(), LaunchSettingsBuilder::new().build());

    let outcome = launcher.launch(&echo_request()).unwrap();

    let Outcome::Replaced(prepared) = outcome else {
        panic!("expected Replaced");
    };
    assert_eq!(prepared.stdin, StdinSource::EmptyPipe);
    let calls = platform.calls();
    assert_eq!(calls[0], MockCall::OpenNull);
    assert_eq!(calls[1], MockCall::OpenEmptyPipe);
    assert_eq!(calls[2], MockCall::MoveFd { src: 3, dst: 0 });
}

#[test]
fn test_closed_stdin_gets_null_device_in_place() {
    let platform = MockPlatform::new().with_stdin_closed();
    let mut launcher = Launcher::new(platform.clone(), LaunchSettingsBuilder::new().build());

    launcher.launch(&echo_request()).unwrap();

    assert_eq!(platform.calls()[1], MockCall::MoveFd { src: 0, dst: 0 });
    assert_eq!(platform.open_fds(), vec![0, 1, 2]);
}

#[test]
fn test_stdin_failure_aborts_before_touching_descriptors() {
    let platform = leaky_process()
        .with_null_error(io::ErrorKind::NotFound)
        .with_pipe_error(io::ErrorKind::Other);
    let mut launcher = Launcher::new(platform.clone(), LaunchSettingsBuilder::new().build());

    let err = launcher.launch(&echo_request()).unwrap_err();

    assert!(matches!(err, LaunchError::Os { .. }), "got {:?}", err);
    assert_eq!(err.exit_code(), 1);
    assert!(
        !platform
            .calls()
            .iter()
            .any(|c| matches!(c, MockCall::Close { .. } | MockCall::ReplaceImage(_)))
    );
    assert_eq!(launcher.state(), LaunchState::Start);
}

#[test]
fn test_missing_program_is_launch_failure_127() {
    let platform = MockPlatform::new().with_exec_error(io::ErrorKind::NotFound);
    let mut launcher = Launcher::new(platform, LaunchSettingsBuilder::new().build());

    let err = launcher.launch(&echo_request()).unwrap_err();

    match &err {
        LaunchError::LaunchFailure { program, .. } => assert_eq!(program, "echo"),
        other => panic!("expected LaunchFailure, got {:?}", other),
    }
    assert_eq!(err.exit_code(), EXIT_NOT_FOUND);
    assert_eq!(launcher.state(), LaunchState::ReplaceFailed);
}

#[test]
fn test_permission_denied_is_launch_failure_126() {
    let platform = MockPlatform::new().with_exec_error(io::ErrorKind::PermissionDenied);
    let mut launcher = Launcher::new(platform, LaunchSettingsBuilder::new().build());

    let err = launcher.launch(&echo_request()).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_NOT_EXECUTABLE);
}

#[cfg(unix)]
#[test]
fn test_nul_byte_rejected_before_any_side_effect() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let platform = leaky_process();
    let mut launcher = Launcher::new(platform.clone(), LaunchSettingsBuilder::new().build());
    let request = LaunchRequest::new("echo", [OsString::from_vec(b"bad\0arg".to_vec())]);

    let err = launcher.launch(&request).unwrap_err();

    assert!(matches!(err, LaunchError::InvalidArgument(_)), "got {:?}", err);
    assert!(platform.calls().is_empty());
    assert_eq!(platform.open_fds().len(), 3 + LEAKED_FDS.len());
}

#[test]
fn test_spawn_mode_prepares_and_delegates() {
    let platform = leaky_process();
    let settings = LaunchSettingsBuilder::new().mode(LaunchMode::Spawn).build();
    let mut launcher = Launcher::new(platform.clone(), settings);

    let outcome = launcher.launch(&echo_request()).unwrap();

    assert!(matches!(outcome, Outcome::Spawn(_)));
    assert_eq!(launcher.state(), LaunchState::Delegated);
    assert_eq!(platform.open_fds(), vec![0, 1, 2]);
    assert!(
        !platform
            .calls()
            .iter()
            .any(|c| matches!(c, MockCall::ReplaceImage(_)))
    );
}

#[test]
fn test_exec_mode_downgrades_without_image_replacement() {
    let platform = MockPlatform::new().without_exec();
    let mut launcher = Launcher::new(platform.clone(), LaunchSettingsBuilder::new().build());

    assert_eq!(launcher.effective_mode(), LaunchMode::Spawn);
    let outcome = launcher.launch(&echo_request()).unwrap();

    assert!(matches!(outcome, Outcome::Spawn(_)));
}

#[test]
fn test_new_session_requested_before_exec() {
    let platform = MockPlatform::new();
    let settings = LaunchSettingsBuilder::new().new_session(true).build();
    let mut launcher = Launcher::new(platform.clone(), settings);

    launcher.launch(&echo_request()).unwrap();

    let calls = platform.calls();
    let n = calls.len();
    assert_eq!(calls[n - 3], MockCall::NewSession);
    assert_eq!(calls[n - 2], MockCall::RestoreSignals);
    assert!(matches!(calls[n - 1], MockCall::ReplaceImage(_)));
    assert!(!calls.contains(&MockCall::DropTerminal));
}

#[test]
fn test_group_leader_releases_terminal_instead() {
    let platform = MockPlatform::new().with_session_error(io::ErrorKind::PermissionDenied);
    let settings = LaunchSettingsBuilder::new().new_session(true).build();
    let mut launcher = Launcher::new(platform.clone(), settings);

    let outcome = launcher.launch(&echo_request()).unwrap();

    assert!(matches!(outcome, Outcome::Replaced(_)));
    let calls = platform.calls();
    let session = calls.iter().position(|c| *c == MockCall::NewSession).unwrap();
    assert_eq!(calls[session + 1], MockCall::DropTerminal);
    assert_eq!(calls[session + 2], MockCall::RestoreSignals);
}

#[test]
fn test_session_failures_are_not_fatal() {
    let platform = MockPlatform::new()
        .with_session_error(io::ErrorKind::PermissionDenied)
        .with_terminal_error(io::ErrorKind::Other);
    let settings = LaunchSettingsBuilder::new().new_session(true).build();
    let mut launcher = Launcher::new(platform, settings);

    let outcome = launcher.launch(&echo_request()).unwrap();

    assert!(matches!(outcome, Outcome::Replaced(_)));
}

#[test]
fn test_other_setsid_errors_keep_terminal() {
    let platform = MockPlatform::new().with_session_error(io::ErrorKind::Other);
    let settings = LaunchSettingsBuilder::new().new_session(true).build();
    let mut launcher = Launcher::new(platform.clone(), settings);

    launcher.launch(&echo_request()).unwrap();

    assert!(!platform.calls().contains(&MockCall::DropTerminal));
}

#[test]
fn test_signal_defaults_restored_only_before_exec() {
    let exec_platform = MockPlatform::new();
    let mut launcher = Launcher::new(exec_platform.clone(), LaunchSettingsBuilder::new().build());
    launcher.launch(&echo_request()).unwrap();
    assert!(exec_platform.calls().contains(&MockCall::RestoreSignals));

    // std's `Command` resets dispositions for spawned children itself.
    let spawn_platform = MockPlatform::new();
    let settings = LaunchSettingsBuilder::new().mode(LaunchMode::Spawn).build();
    let mut launcher = Launcher::new(spawn_platform.clone(), settings);
    launcher.launch(&echo_request()).unwrap();
    assert!(!spawn_platform.calls().contains(&MockCall::RestoreSignals));
}

#[test]
fn test_no_session_call_by_default() {
    let platform = MockPlatform::new();
    let mut launcher = Launcher::new(platform.clone(), LaunchSettingsBuilder::new().build());

    launcher.launch(&echo_request()).unwrap();

    assert!(!platform.calls().contains(&MockCall::NewSession));
}
