// src/sys/unix.rs

use std::ffi::CString;
use std::fs;
use std::io;
use std::os::fd::IntoRawFd;

use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::resource::{getrlimit, Resource};
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2, execvp, getpid, getsid, pipe, setsid};
use tracing::trace;

use super::Platform;
use crate::types::Fd;

const NULL_DEVICE: &str = "/dev/null";
const CONTROLLING_TTY: &str = "/dev/tty";

nix::ioctl_none_bad!(tiocnotty, nix::libc::TIOCNOTTY);

#[cfg(target_os = "linux")]
const FD_DIR: Option<&str> = Some("/proc/self/fd");
#[cfg(target_os = "macos")]
const FD_DIR: Option<&str> = Some("/dev/fd");
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
const FD_DIR: Option<&str> = None;

/// `Platform` backed by the real process.
#[derive(Debug, Clone, Default)]
pub struct UnixPlatform;

impl UnixPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Platform for UnixPlatform {
    fn supports_exec(&self) -> bool {
        true
    }

    fn open_null(&mut self) -> io::Result<Fd> {
        open(NULL_DEVICE, OFlag::O_RDONLY, Mode::empty()).map_err(io::Error::from)
    }

    fn open_empty_pipe(&mut self) -> io::Result<Fd> {
        let (read_end, write_end) = pipe().map_err(io::Error::from)?;
        drop(write_end);
        Ok(read_end.into_raw_fd())
    }

    fn move_fd(&mut self, src: Fd, dst: Fd) -> io::Result<()> {
        if src == dst {
            return Ok(());
        }
        dup2(src, dst).map_err(io::Error::from)?;
        close(src).map_err(io::Error::from)
    }

    fn list_open_fds(&self) -> Option<Vec<Fd>> {
        let dir = FD_DIR?;
        // The directory handle itself shows up in the listing; it is closed
        // again before the caller acts on the result.
        let entries = fs::read_dir(dir).ok()?;
        let fds = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().and_then(|s| s.parse::<Fd>().ok()))
            .collect::<Vec<_>>();
        trace!(dir, count = fds.len(), "enumerated descriptor directory");
        Some(fds)
    }

    fn fd_limit(&self) -> Option<u64> {
        getrlimit(Resource::RLIMIT_NOFILE)
            .ok()
            .map(|(soft, _hard)| soft as u64)
    }

    fn close_fd(&mut self, fd: Fd) -> bool {
        close(fd).is_ok()
    }

    fn new_session(&mut self) -> io::Result<()> {
        setsid().map(|_| ()).map_err(io::Error::from)
    }

    fn drop_controlling_terminal(&mut self) -> io::Result<()> {
        // TIOCNOTTY from a session leader would hang up the foreground group.
        if getsid(None).map_err(io::Error::from)? == getpid() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "session leader cannot release its controlling terminal",
            ));
        }
        let tty = match open(CONTROLLING_TTY, OFlag::O_RDWR | OFlag::O_NOCTTY, Mode::empty()) {
            Ok(fd) => fd,
            Err(Errno::ENXIO) => {
                trace!("no controlling terminal to release");
                return Ok(());
            }
            Err(errno) => return Err(io::Error::from(errno)),
        };
        // SAFETY: `tty` is a descriptor we just opened and TIOCNOTTY takes
        // no argument.
        let released = unsafe { tiocnotty(tty) };
        let _ = close(tty);
        released.map(|_| ()).map_err(io::Error::from)
    }

    fn restore_signal_defaults(&mut self) -> io::Result<()> {
        // SAFETY: installing SIG_DFL runs no handler code; the process is
        // single-threaded on this path.
        unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) }
            .map(|_| ())
            .map_err(io::Error::from)
    }

    fn replace_image(&mut self, argv: &[CString]) -> io::Result<()> {
        let Some(program) = argv.first() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty argument vector",
            ));
        };
        let Err(errno) = execvp(program.as_c_str(), argv);
        Err(io::Error::from(errno))
    }
}
