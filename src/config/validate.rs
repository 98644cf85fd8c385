// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LaunchError, Result};
use crate::types::{FIRST_NON_STD_FD, Fd, MAX_SCAN_FD};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = LaunchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_max_fd(raw.launch.max_fd, "[launch].max_fd")?;
        Ok(ConfigFile::new_unchecked(raw.launch))
    }
}

/// Check that a scan bound covers at least one non-standard descriptor and
/// stays below [`MAX_SCAN_FD`].
///
/// `origin` names where the value came from, for the error message.
pub fn validate_max_fd(max_fd: Fd, origin: &str) -> Result<()> {
    if max_fd < FIRST_NON_STD_FD {
        return Err(LaunchError::ConfigError(format!(
            "{origin} must be >= {FIRST_NON_STD_FD} (got {max_fd})"
        )));
    }
    if max_fd > MAX_SCAN_FD {
        return Err(LaunchError::ConfigError(format!(
            "{origin} must be <= {MAX_SCAN_FD} (got {max_fd})"
        )));
    }
    Ok(())
}
