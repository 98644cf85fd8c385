// src/config/model.rs

use serde::Deserialize;

use crate::types::{DEFAULT_MAX_FD, Fd, FdStrategy, LaunchMode};

/// Raw configuration as read from a TOML file, before validation.
///
/// ```toml
/// [launch]
/// mode = "exec"
/// fd_strategy = "auto"
/// max_fd = 1023
/// new_session = false
/// ```
///
/// Every key is optional; an empty file is a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub launch: LaunchSection,
}

/// `[launch]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchSection {
    /// `"exec"` (default) or `"spawn"`.
    #[serde(default)]
    pub mode: LaunchMode,

    /// How descriptors to close are found.
    #[serde(default)]
    pub fd_strategy: FdStrategy,

    /// Upper bound for the `range` strategy (inclusive).
    #[serde(default = "default_max_fd")]
    pub max_fd: Fd,

    /// Call `setsid()` before replacing the image.
    #[serde(default)]
    pub new_session: bool,
}

fn default_max_fd() -> Fd {
    DEFAULT_MAX_FD
}

impl Default for LaunchSection {
    fn default() -> Self {
        Self {
            mode: LaunchMode::default(),
            fd_strategy: FdStrategy::default(),
            max_fd: default_max_fd(),
            new_session: false,
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// holders can rely on the value ranges being checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    launch: LaunchSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(launch: LaunchSection) -> Self {
        Self { launch }
    }

    pub fn launch(&self) -> &LaunchSection {
        &self.launch
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(LaunchSection::default())
    }
}
