// src/exec/replace.rs

//! Image replacement: argv conversion and the final `execvp`.

use std::ffi::{CString, OsStr, OsString};
use std::io;

use tracing::{debug, info};

use crate::errors::{LaunchError, Result};
use crate::exec::resolve::{resolve_in_env, Resolution};
use crate::sys::Platform;

/// Build the C argument vector: `program` as argv[0], then `args`.
///
/// Bytes are passed through unchanged (non-UTF-8 included on unix). An
/// interior NUL cannot be represented and is rejected before any descriptor
/// is touched.
pub fn to_c_argv(program: &OsStr, args: &[OsString]) -> Result<Vec<CString>> {
    std::iter::once(program)
        .chain(args.iter().map(OsString::as_os_str))
        .enumerate()
        .map(|(idx, arg)| {
            CString::new(os_bytes(arg)?).map_err(|_| {
                LaunchError::InvalidArgument(format!(
                    "argument {idx} ({}) contains a NUL byte",
                    arg.to_string_lossy()
                ))
            })
        })
        .collect()
}

#[cfg(unix)]
fn os_bytes(arg: &OsStr) -> Result<Vec<u8>> {
    use std::os::unix::ffi::OsStrExt;
    Ok(arg.as_bytes().to_vec())
}

#[cfg(not(unix))]
fn os_bytes(arg: &OsStr) -> Result<Vec<u8>> {
    arg.to_str()
        .map(|s| s.as_bytes().to_vec())
        .ok_or_else(|| {
            LaunchError::InvalidArgument(format!(
                "argument {} is not valid unicode",
                arg.to_string_lossy()
            ))
        })
}

/// Hand the process over to the target.
///
/// Returns `Ok(())` only on simulated platforms; with the real platform a
/// return always carries the [`LaunchError::LaunchFailure`].
pub fn replace_image<P: Platform>(
    platform: &mut P,
    program: &OsStr,
    argv: &[CString],
) -> Result<()> {
    info!(program = %program.to_string_lossy(), argc = argv.len(), "replacing process image");

    let source = match platform.replace_image(argv) {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };

    let hint = match resolve_in_env(program) {
        Resolution::Found(path) => format!("found at {}", path.display()),
        Resolution::NotExecutable(path) => format!("{} is not executable", path.display()),
        Resolution::NotFound => "not found on PATH".to_string(),
    };
    debug!(
        program = %program.to_string_lossy(),
        error = %source,
        hint = %hint,
        "image replacement failed"
    );

    Err(launch_failure(program, source))
}

pub(crate) fn launch_failure(program: &OsStr, source: io::Error) -> LaunchError {
    LaunchError::LaunchFailure {
        program: program.to_string_lossy().into_owned(),
        source,
    }
}
