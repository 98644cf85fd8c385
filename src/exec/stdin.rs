// src/exec/stdin.rs

//! Standard-input isolation.

use tracing::{debug, warn};

use crate::errors::{LaunchError, Result};
use crate::sys::Platform;
use crate::types::StdinSource;

const STDIN_FD: i32 = 0;

/// Point descriptor 0 at an empty source.
///
/// `/dev/null` is preferred. If it cannot be opened (e.g. a minimal chroot),
/// the read end of a pipe with no writer is used instead; both yield EOF on
/// the first read.
pub fn isolate_stdin<P: Platform>(platform: &mut P) -> Result<StdinSource> {
    match platform.open_null() {
        Ok(fd) => {
            platform
                .move_fd(fd, STDIN_FD)
                .map_err(|source| LaunchError::Os {
                    op: "redirecting stdin to /dev/null",
                    source,
                })?;
            debug!(fd, "stdin redirected to /dev/null");
            return Ok(StdinSource::DevNull);
        }
        Err(err) => {
            warn!(error = %err, "cannot open /dev/null; falling back to an empty pipe");
        }
    }

    let fd = platform
        .open_empty_pipe()
        .map_err(|source| LaunchError::Os {
            op: "creating empty stdin pipe",
            source,
        })?;
    platform
        .move_fd(fd, STDIN_FD)
        .map_err(|source| LaunchError::Os {
            op: "redirecting stdin to empty pipe",
            source,
        })?;
    debug!(fd, "stdin redirected to empty pipe");
    Ok(StdinSource::EmptyPipe)
}
