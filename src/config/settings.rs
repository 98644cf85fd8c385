// src/config/settings.rs

//! Effective launch settings.
//!
//! Precedence: CLI flag > config file > built-in default.

use crate::cli::CliArgs;
use crate::config::model::ConfigFile;
use crate::config::validate::validate_max_fd;
use crate::errors::Result;
use crate::types::{DEFAULT_MAX_FD, Fd, FdStrategy, LaunchMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchSettings {
    pub mode: LaunchMode,
    pub fd_strategy: FdStrategy,
    pub max_fd: Fd,
    pub new_session: bool,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            mode: LaunchMode::default(),
            fd_strategy: FdStrategy::default(),
            max_fd: DEFAULT_MAX_FD,
            new_session: false,
        }
    }
}

impl LaunchSettings {
    /// Settings as described by a validated config file.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let launch = cfg.launch();
        Self {
            mode: launch.mode,
            fd_strategy: launch.fd_strategy,
            max_fd: launch.max_fd,
            new_session: launch.new_session,
        }
    }

    /// Apply CLI overrides on top of `self`.
    ///
    /// `--new-session` can only switch the flag on; there is no way to turn
    /// off a session request from the config on the command line.
    pub fn with_cli(mut self, args: &CliArgs) -> Result<Self> {
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(strategy) = args.fd_strategy {
            self.fd_strategy = strategy;
        }
        if let Some(max_fd) = args.max_fd {
            validate_max_fd(max_fd, "--max-fd")?;
            self.max_fd = max_fd;
        }
        if args.new_session {
            self.new_session = true;
        }
        Ok(self)
    }
}
