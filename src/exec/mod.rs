// src/exec/mod.rs

//! Process launch layer.
//!
//! - [`launcher`] owns the launch sequence and the [`LaunchRequest`] type.
//! - [`state`] is the launch state machine.
//! - [`stdin`] rebinds descriptor 0 to an empty source.
//! - [`fds`] plans and performs descriptor hygiene.
//! - [`resolve`] mirrors `execvp`'s `PATH` search for diagnostics.
//! - [`replace`] converts argv and performs the image replacement.
//! - [`emulate`] is the spawn-and-forward path built on
//!   `tokio::process::Command`.

pub mod emulate;
pub mod fds;
pub mod launcher;
pub mod replace;
pub mod resolve;
pub mod state;
pub mod stdin;

pub use emulate::spawn_and_wait;
pub use launcher::{LaunchRequest, Launcher, Outcome, Prepared};
pub use state::LaunchState;
