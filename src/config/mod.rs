// src/config/mod.rs

//! Configuration loading and validation for cleanexec.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate value ranges (`validate.rs`).
//! - Merge defaults, file and CLI flags into [`LaunchSettings`] (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, LaunchSection, RawConfigFile};
pub use settings::LaunchSettings;
