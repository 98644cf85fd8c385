// src/exec/emulate.rs

//! Spawn-and-forward emulation of image replacement.
//!
//! Used where `exec` is unavailable or when `mode = "spawn"` is selected.
//! The target runs as a child with stdin bound to null and stdout/stderr
//! inherited; termination signals received by the launcher are forwarded to
//! it, and the launcher exits with the child's status once it is gone, so no
//! extra process outlives the target.

use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::launcher::LaunchRequest;
use crate::exec::replace::launch_failure;

/// Run the target as a child and wait for it, returning the status the
/// launcher should exit with.
pub async fn spawn_and_wait(request: &LaunchRequest, new_session: bool) -> Result<i32> {
    let mut cmd = Command::new(&request.program);
    cmd.args(&request.args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    if new_session {
        detach_child_session(&mut cmd);
    }

    let child = cmd
        .spawn()
        .map_err(|source| launch_failure(&request.program, source))?;

    info!(
        program = %request.program.to_string_lossy(),
        pid = child.id(),
        "spawned target process"
    );

    let status = wait_forwarding_signals(child).await?;
    let code = exit_code_from_status(status);
    info!(
        program = %request.program.to_string_lossy(),
        exit_code = code,
        success = status.success(),
        "target process exited"
    );
    Ok(code)
}

/// Exit status to report for a finished child.
///
/// A child killed by signal `N` maps to `128 + N`, like a shell reports it.
pub fn exit_code_from_status(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    signal_exit_code(status).unwrap_or(1)
}

#[cfg(unix)]
fn signal_exit_code(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|sig| 128 + sig)
}

#[cfg(not(unix))]
fn signal_exit_code(_status: ExitStatus) -> Option<i32> {
    None
}

#[cfg(unix)]
fn detach_child_session(cmd: &mut Command) {
    // SAFETY: `setsid` is async-signal-safe and touches no state shared with
    // the parent.
    unsafe {
        cmd.pre_exec(|| {
            nix::unistd::setsid().map_err(std::io::Error::from)?;
            Ok(())
        });
    }
}

#[cfg(not(unix))]
fn detach_child_session(_cmd: &mut Command) {
    debug!("new_session has no effect on this platform");
}

#[cfg(unix)]
async fn wait_forwarding_signals(mut child: Child) -> Result<ExitStatus> {
    use nix::sys::signal::Signal;
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let mut quit = signal(SignalKind::quit())?;

    loop {
        let forwarded = tokio::select! {
            status = child.wait() => return Ok(status?),
            _ = interrupt.recv() => Signal::SIGINT,
            _ = terminate.recv() => Signal::SIGTERM,
            _ = hangup.recv() => Signal::SIGHUP,
            _ = quit.recv() => Signal::SIGQUIT,
        };
        forward_signal(&child, forwarded);
    }
}

#[cfg(unix)]
fn forward_signal(child: &Child, sig: nix::sys::signal::Signal) {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        debug!(signal = %sig, "child already reaped; not forwarding");
        return;
    };
    let Ok(raw_pid) = i32::try_from(pid) else {
        tracing::warn!(pid, "child pid out of range; not forwarding");
        return;
    };
    match kill(Pid::from_raw(raw_pid), sig) {
        Ok(()) => debug!(pid, signal = %sig, "forwarded signal to target"),
        Err(errno) => tracing::warn!(pid, signal = %sig, error = %errno, "failed to forward signal"),
    }
}

#[cfg(not(unix))]
async fn wait_forwarding_signals(mut child: Child) -> Result<ExitStatus> {
    loop {
        tokio::select! {
            status = child.wait() => return Ok(status?),
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    tracing::warn!(error = %e, "failed to listen for Ctrl+C");
                    return Ok(child.wait().await?);
                }
                debug!("Ctrl+C received; stopping target");
                if let Err(e) = child.start_kill() {
                    tracing::warn!(error = %e, "failed to stop target");
                }
            }
        }
    }
}
