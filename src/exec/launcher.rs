// src/exec/launcher.rs

//! The process launcher: stdin isolation, descriptor hygiene, hand-off.

use std::ffi::OsString;
use std::io;

use tracing::{debug, info, warn};

use crate::config::LaunchSettings;
use crate::errors::Result;
use crate::exec::fds::{close_inherited_fds, FdReport};
use crate::exec::replace::{replace_image, to_c_argv};
use crate::exec::state::{LaunchState, LaunchStateMachine};
use crate::exec::stdin::isolate_stdin;
use crate::sys::Platform;
use crate::types::{LaunchMode, StdinSource};

/// What to run: the program (also forwarded as argv[0]) and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl LaunchRequest {
    pub fn new(program: impl Into<OsString>, args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// What the process looked like right before hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prepared {
    pub stdin: StdinSource,
    pub fds: FdReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The image was replaced. Only observable with a simulated platform.
    Replaced(Prepared),
    /// The caller must now spawn the target and forward signals to it.
    Spawn(Prepared),
}

/// Runs the launch sequence against a [`Platform`].
#[derive(Debug)]
pub struct Launcher<P: Platform> {
    platform: P,
    settings: LaunchSettings,
    state: LaunchStateMachine,
}

impl<P: Platform> Launcher<P> {
    pub fn new(platform: P, settings: LaunchSettings) -> Self {
        Self {
            platform,
            settings,
            state: LaunchStateMachine::new(),
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state.state()
    }

    pub fn settings(&self) -> &LaunchSettings {
        &self.settings
    }

    /// Mode actually used: `exec` falls back to `spawn` where the platform
    /// cannot replace images.
    pub fn effective_mode(&self) -> LaunchMode {
        match self.settings.mode {
            LaunchMode::Exec if !self.platform.supports_exec() => LaunchMode::Spawn,
            mode => mode,
        }
    }

    /// Perform the launch sequence.
    ///
    /// - In `exec` mode this only returns on failure (real platform).
    /// - In `spawn` mode it returns [`Outcome::Spawn`] once stdin and the
    ///   descriptor table are clean.
    ///
    /// The argument vector is validated before anything is touched, so an
    /// unrepresentable argument leaves the process unchanged.
    pub fn launch(&mut self, request: &LaunchRequest) -> Result<Outcome> {
        let mode = self.effective_mode();
        if mode != self.settings.mode {
            info!("image replacement unavailable; spawning the target instead");
        }

        let argv = match mode {
            LaunchMode::Exec => Some(to_c_argv(&request.program, &request.args)?),
            LaunchMode::Spawn => None,
        };

        let stdin = isolate_stdin(&mut self.platform)?;
        self.state.advance(LaunchState::StdinRedirected)?;

        let fds = close_inherited_fds(
            &mut self.platform,
            self.settings.fd_strategy,
            self.settings.max_fd,
        );
        self.state.advance(LaunchState::FdsClosed)?;

        let prepared = Prepared { stdin, fds };

        let Some(argv) = argv else {
            self.state.advance(LaunchState::Delegated)?;
            return Ok(Outcome::Spawn(prepared));
        };

        if self.settings.new_session {
            self.detach_session();
        }
        if let Err(err) = self.platform.restore_signal_defaults() {
            warn!(error = %err, "could not restore default signal dispositions");
        }

        match replace_image(&mut self.platform, &request.program, &argv) {
            Ok(()) => {
                self.state.advance(LaunchState::Replaced)?;
                Ok(Outcome::Replaced(prepared))
            }
            Err(err) => {
                self.state.advance(LaunchState::ReplaceFailed)?;
                Err(err)
            }
        }
    }

    fn detach_session(&mut self) {
        let err = match self.platform.new_session() {
            Ok(()) => {
                debug!("started new session; no controlling terminal");
                return;
            }
            Err(err) => err,
        };
        if err.kind() != io::ErrorKind::PermissionDenied {
            warn!(error = %err, "setsid failed; keeping controlling terminal");
            return;
        }

        // Process group leaders cannot start a session; release the
        // terminal in place instead.
        debug!("already a process group leader; releasing controlling terminal");
        match self.platform.drop_controlling_terminal() {
            Ok(()) => debug!("controlling terminal released"),
            Err(err) => warn!(error = %err, "could not release controlling terminal"),
        }
    }
}
