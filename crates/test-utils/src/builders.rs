// crates/test-utils/src/builders.rs

#![allow(dead_code)]

use cleanexec::config::{ConfigFile, LaunchSection, LaunchSettings, RawConfigFile};
use cleanexec::types::{Fd, FdStrategy, LaunchMode};

/// Builder for `LaunchSettings` to simplify test setup.
pub struct LaunchSettingsBuilder {
    settings: LaunchSettings,
}

impl LaunchSettingsBuilder {
    pub fn new() -> Self {
        Self {
            settings: LaunchSettings::default(),
        }
    }

    pub fn mode(mut self, mode: LaunchMode) -> Self {
        self.settings.mode = mode;
        self
    }

    pub fn fd_strategy(mut self, strategy: FdStrategy) -> Self {
        self.settings.fd_strategy = strategy;
        self
    }

    pub fn max_fd(mut self, max_fd: Fd) -> Self {
        self.settings.max_fd = max_fd;
        self
    }

    pub fn new_session(mut self, val: bool) -> Self {
        self.settings.new_session = val;
        self
    }

    pub fn build(self) -> LaunchSettings {
        self.settings
    }
}

impl Default for LaunchSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ConfigFile`, going through the same validation as a file
/// on disk.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                launch: LaunchSection::default(),
            },
        }
    }

    pub fn mode(mut self, mode: LaunchMode) -> Self {
        self.config.launch.mode = mode;
        self
    }

    pub fn fd_strategy(mut self, strategy: FdStrategy) -> Self {
        self.config.launch.fd_strategy = strategy;
        self
    }

    pub fn max_fd(mut self, max_fd: Fd) -> Self {
        self.config.launch.max_fd = max_fd;
        self
    }

    pub fn new_session(mut self, val: bool) -> Self {
        self.config.launch.new_session = val;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
