// src/errors.rs

//! Crate-wide error type and exit-code mapping.

use std::io;

use thiserror::Error;

use crate::exec::state::LaunchState;

/// Exit status when the target cannot be found (shell convention).
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit status when the target exists but cannot be executed.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Exit status for usage errors.
pub const EXIT_USAGE: i32 = 2;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{op} failed: {source}")]
    Os {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("illegal launch state transition {from:?} -> {to:?}")]
    State { from: LaunchState, to: LaunchState },

    #[error("cannot execute '{program}': {source}")]
    LaunchFailure {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LaunchError {
    /// Process exit status the launcher terminates with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::LaunchFailure { source, .. } => {
                if source.kind() == io::ErrorKind::NotFound {
                    EXIT_NOT_FOUND
                } else {
                    EXIT_NOT_EXECUTABLE
                }
            }
            LaunchError::InvalidArgument(_) => EXIT_USAGE,
            _ => 1,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LaunchError>;
