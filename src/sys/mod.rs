// src/sys/mod.rs

//! OS process-control interface.
//!
//! The launcher talks to a [`Platform`] instead of calling `nix` directly, so
//! the step ordering and fallbacks can be exercised against [`mock`] without
//! touching the test runner's own descriptor table.
//!
//! - [`unix`] is the real implementation (unix only).
//! - [`mock`] records every call and simulates a descriptor table.

use std::ffi::CString;
use std::fmt::Debug;
use std::io;

use crate::types::Fd;

pub mod mock;
#[cfg(unix)]
pub mod unix;

#[cfg(unix)]
pub use unix::UnixPlatform as RealPlatform;

/// Abstract process-control interface.
pub trait Platform: Debug {
    /// Whether [`Platform::replace_image`] can succeed at all.
    fn supports_exec(&self) -> bool;

    /// Open the null device read-only and return the new descriptor.
    fn open_null(&mut self) -> io::Result<Fd>;

    /// Create a pipe, close its write end and return the read end.
    fn open_empty_pipe(&mut self) -> io::Result<Fd>;

    /// Make `dst` refer to what `src` refers to, then close `src`.
    ///
    /// A no-op when `src == dst`.
    fn move_fd(&mut self, src: Fd, dst: Fd) -> io::Result<()>;

    /// Descriptors currently open in this process, or `None` when the
    /// platform offers no way to enumerate them.
    fn list_open_fds(&self) -> Option<Vec<Fd>>;

    /// Soft limit on the number of open descriptors, if it can be queried.
    fn fd_limit(&self) -> Option<u64>;

    /// Close a descriptor. Returns `false` if it was not open.
    fn close_fd(&mut self, fd: Fd) -> bool;

    /// Become the leader of a new session (no controlling terminal).
    fn new_session(&mut self) -> io::Result<()>;

    /// Give up the controlling terminal without changing session.
    ///
    /// Used when [`Platform::new_session`] is refused because the process
    /// already leads its process group. Succeeds trivially when there is no
    /// controlling terminal.
    fn drop_controlling_terminal(&mut self) -> io::Result<()>;

    /// Put back the default dispositions of signals the Rust runtime ignores
    /// at startup (`SIGPIPE`), so the target starts like a direct child of
    /// the caller would.
    fn restore_signal_defaults(&mut self) -> io::Result<()>;

    /// Replace the process image with `argv[0]`, searching `PATH`.
    ///
    /// The real implementation only ever returns `Err`; an `Ok` can only
    /// come from a simulated platform.
    fn replace_image(&mut self, argv: &[CString]) -> io::Result<()>;
}
