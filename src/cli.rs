// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Everything after `PROGRAM` is forwarded to the target untouched, including
//! arguments that look like flags, so launcher options must come first.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::{Fd, FdStrategy, LaunchMode};

/// Command-line arguments for `cleanexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cleanexec",
    version,
    about = "Run a program with stdin detached and no inherited file descriptors.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to an optional config file (TOML).
    #[arg(long, value_name = "PATH", env = "CLEANEXEC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Replace this process (`exec`) or run the target as a child (`spawn`).
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<LaunchMode>,

    /// How inherited descriptors are found before closing them.
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub fd_strategy: Option<FdStrategy>,

    /// Highest descriptor number closed by the `range` strategy.
    #[arg(long, value_name = "N")]
    pub max_fd: Option<Fd>,

    /// Start a new session so the target has no controlling terminal.
    ///
    /// When the launcher already leads its process group (as under a
    /// job-control shell) the session is kept and only the terminal is
    /// released.
    #[arg(long)]
    pub new_session: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CLEANEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print what would be launched, but don't touch stdin, descriptors or
    /// the process image.
    #[arg(long)]
    pub dry_run: bool,

    /// Program to run followed by its arguments.
    ///
    /// The program is looked up in `PATH` unless it contains a `/`; the whole
    /// vector (program included, as argv[0]) is forwarded verbatim.
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(OsString)
    )]
    pub command: Vec<OsString>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    /// Target program (argv[0] of the forwarded vector).
    pub fn program(&self) -> &OsString {
        &self.command[0]
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[OsString] {
        &self.command[1..]
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
