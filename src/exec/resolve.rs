// src/exec/resolve.rs

//! Program lookup, following the same rules as `execvp`.
//!
//! Image replacement does its own search; this module exists so `--dry-run`
//! can show what would run and so a launch failure can say whether the
//! program was missing or merely not executable.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Search path used when `PATH` is unset.
const DEFAULT_SEARCH_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An executable regular file.
    Found(PathBuf),
    /// A regular file without execute permission (and nothing better later
    /// on the search path).
    NotExecutable(PathBuf),
    NotFound,
}

/// Resolve `program` against `search_path` (the value of `PATH`).
///
/// - Names containing a `/` are taken as paths and not searched.
/// - An empty `PATH` element means the current directory.
pub fn resolve_program(program: &OsStr, search_path: Option<&OsStr>) -> Resolution {
    if program.is_empty() {
        return Resolution::NotFound;
    }

    if has_separator(program) {
        return classify(Path::new(program)).unwrap_or(Resolution::NotFound);
    }

    let search_path = search_path.unwrap_or(OsStr::new(DEFAULT_SEARCH_PATH));
    let mut first_denied = None;
    for dir in env::split_paths(search_path) {
        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir
        };
        match classify(&dir.join(program)) {
            Some(found @ Resolution::Found(_)) => return found,
            Some(Resolution::NotExecutable(path)) => {
                first_denied.get_or_insert(path);
            }
            _ => {}
        }
    }

    match first_denied {
        Some(path) => Resolution::NotExecutable(path),
        None => Resolution::NotFound,
    }
}

/// Resolve against the current process's `PATH`.
pub fn resolve_in_env(program: &OsStr) -> Resolution {
    let path = env::var_os("PATH");
    resolve_program(program, path.as_deref())
}

fn has_separator(program: &OsStr) -> bool {
    program.to_string_lossy().contains('/')
}

fn classify(candidate: &Path) -> Option<Resolution> {
    let meta = candidate.metadata().ok()?;
    if !meta.is_file() {
        return None;
    }
    if is_executable(&meta) {
        Some(Resolution::Found(candidate.to_path_buf()))
    } else {
        Some(Resolution::NotExecutable(candidate.to_path_buf()))
    }
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}
