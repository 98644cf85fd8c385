// tests/state_and_errors.rs

use std::io;

use cleanexec::errors::{LaunchError, EXIT_NOT_EXECUTABLE, EXIT_NOT_FOUND, EXIT_USAGE};
use cleanexec::exec::state::{LaunchState, LaunchStateMachine};

#[test]
fn test_happy_path_transitions() {
    let mut sm = LaunchStateMachine::new();
    assert_eq!(sm.state(), LaunchState::Start);

    sm.advance(LaunchState::StdinRedirected).unwrap();
    sm.advance(LaunchState::FdsClosed).unwrap();
    sm.advance(LaunchState::Replaced).unwrap();

    assert!(sm.state().is_terminal());
}

#[test]
fn test_skipping_a_step_is_rejected() {
    let mut sm = LaunchStateMachine::new();

    let err = sm.advance(LaunchState::FdsClosed).unwrap_err();

    match err {
        LaunchError::State { from, to } => {
            assert_eq!(from, LaunchState::Start);
            assert_eq!(to, LaunchState::FdsClosed);
        }
        other => panic!("expected State error, got {:?}", other),
    }
    assert_eq!(sm.state(), LaunchState::Start);
}

#[test]
fn test_cannot_replace_before_fds_closed() {
    assert!(!LaunchState::StdinRedirected.can_advance_to(LaunchState::Replaced));
    assert!(!LaunchState::Start.can_advance_to(LaunchState::Delegated));
}

#[test]
fn test_terminal_states_have_no_successor() {
    for terminal in [
        LaunchState::Replaced,
        LaunchState::ReplaceFailed,
        LaunchState::Delegated,
    ] {
        assert!(terminal.is_terminal());
        for next in [
            LaunchState::Start,
            LaunchState::StdinRedirected,
            LaunchState::FdsClosed,
            LaunchState::Replaced,
            LaunchState::ReplaceFailed,
            LaunchState::Delegated,
        ] {
            assert!(!terminal.can_advance_to(next), "{terminal:?} -> {next:?}");
        }
    }
}

#[test]
fn test_exit_codes() {
    let not_found = LaunchError::LaunchFailure {
        program: "nope".to_string(),
        source: io::Error::from(io::ErrorKind::NotFound),
    };
    let denied = LaunchError::LaunchFailure {
        program: "nope".to_string(),
        source: io::Error::from(io::ErrorKind::PermissionDenied),
    };
    let config = LaunchError::ConfigError("bad".to_string());
    let arg = LaunchError::InvalidArgument("bad".to_string());

    assert_eq!(not_found.exit_code(), EXIT_NOT_FOUND);
    assert_eq!(denied.exit_code(), EXIT_NOT_EXECUTABLE);
    assert_eq!(config.exit_code(), 1);
    assert_eq!(arg.exit_code(), EXIT_USAGE);
    assert!(not_found.to_string().contains("cannot execute 'nope'"));
}
