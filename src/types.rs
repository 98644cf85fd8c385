// src/types.rs

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Descriptor number as used by the platform layer.
///
/// Matches `RawFd` on unix; kept as a plain alias so the mock platform and the
/// planning code compile everywhere.
pub type Fd = i32;

/// First descriptor number above the three standard streams.
pub const FIRST_NON_STD_FD: Fd = 3;

/// Upper bound of the fixed scan range in the reference behaviour.
pub const DEFAULT_MAX_FD: Fd = 1023;

/// Hard cap on any numeric scan, so an `RLIM_INFINITY` soft limit does not turn
/// into billions of `close` calls.
pub const MAX_SCAN_FD: Fd = 65_536;

/// How control is handed to the target program.
///
/// - `Exec`: replace the current process image (default on unix).
/// - `Spawn`: run the target as a child, forward signals, and exit with its
///   status. Always used on platforms without image replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    #[default]
    Exec,
    Spawn,
}

impl FromStr for LaunchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exec" => Ok(LaunchMode::Exec),
            "spawn" => Ok(LaunchMode::Spawn),
            other => Err(format!(
                "invalid launch mode: {other} (expected \"exec\" or \"spawn\")"
            )),
        }
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchMode::Exec => f.write_str("exec"),
            LaunchMode::Spawn => f.write_str("spawn"),
        }
    }
}

/// How the set of descriptors to close is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FdStrategy {
    /// Enumerate if the platform allows it, else fall back to the descriptor
    /// limit, else to the fixed range.
    #[default]
    Auto,
    /// Close exactly the descriptors listed by the platform.
    Enumerate,
    /// Close every number in `3..=max_fd`.
    Range,
    /// Close every number below the soft `RLIMIT_NOFILE`.
    Limit,
}

impl FromStr for FdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(FdStrategy::Auto),
            "enumerate" => Ok(FdStrategy::Enumerate),
            "range" => Ok(FdStrategy::Range),
            "limit" => Ok(FdStrategy::Limit),
            other => Err(format!(
                "invalid fd strategy: {other} (expected \"auto\", \"enumerate\", \"range\" or \"limit\")"
            )),
        }
    }
}

impl fmt::Display for FdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FdStrategy::Auto => "auto",
            FdStrategy::Enumerate => "enumerate",
            FdStrategy::Range => "range",
            FdStrategy::Limit => "limit",
        };
        f.write_str(s)
    }
}

/// Where descriptor 0 points after isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinSource {
    /// `/dev/null`, opened read-only.
    DevNull,
    /// Read end of a pipe whose write end is already closed.
    EmptyPipe,
}
