// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod sys;
pub mod types;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{load_and_validate, ConfigFile, LaunchSettings};
use crate::errors::Result;
use crate::exec::resolve::{resolve_in_env, Resolution};
use crate::exec::LaunchRequest;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - the dry-run report
/// - the launcher (exec mode never comes back on success)
/// - the spawn-and-forward path
///
/// Returns the status the launcher process should exit with.
pub fn run(args: CliArgs) -> Result<i32> {
    let config = match args.config.as_deref() {
        Some(path) => load_and_validate(path)?,
        None => ConfigFile::default(),
    };
    let settings = LaunchSettings::from_config(&config).with_cli(&args)?;
    let request = LaunchRequest::new(args.program().clone(), args.args().to_vec());
    debug!(?settings, ?request, "resolved launch request");

    if args.dry_run {
        print_dry_run(&settings, &request);
        return Ok(0);
    }

    launch(settings, request)
}

#[cfg(unix)]
fn launch(settings: LaunchSettings, request: LaunchRequest) -> Result<i32> {
    use crate::exec::{Launcher, Outcome};
    use crate::sys::RealPlatform;

    let mut launcher = Launcher::new(RealPlatform::new(), settings);
    match launcher.launch(&request)? {
        // Unreachable with the real platform: a successful exec never returns.
        Outcome::Replaced(_) => Ok(0),
        Outcome::Spawn(_) => run_spawned(&request, settings.new_session),
    }
}

#[cfg(not(unix))]
fn launch(settings: LaunchSettings, request: LaunchRequest) -> Result<i32> {
    tracing::info!("no image replacement on this platform; spawning the target");
    run_spawned(&request, settings.new_session)
}

/// Build a current-thread runtime and run the emulation path on it.
///
/// Called only after descriptor hygiene, so the runtime's own descriptors are
/// never candidates for closing.
fn run_spawned(request: &LaunchRequest, new_session: bool) -> Result<i32> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(exec::spawn_and_wait(request, new_session))
}

/// Dry-run output: settings, program resolution and forwarded argv.
fn print_dry_run(settings: &LaunchSettings, request: &LaunchRequest) {
    println!("cleanexec dry-run");
    println!("  launch.mode = {}", settings.mode);
    println!("  launch.fd_strategy = {}", settings.fd_strategy);
    println!("  launch.max_fd = {}", settings.max_fd);
    println!("  launch.new_session = {}", settings.new_session);
    println!();

    let program = request.program.to_string_lossy();
    match resolve_in_env(&request.program) {
        Resolution::Found(path) => println!("program: {program} -> {}", path.display()),
        Resolution::NotExecutable(path) => {
            println!("program: {program} -> {} (not executable)", path.display())
        }
        Resolution::NotFound => println!("program: {program} -> (not found)"),
    }

    println!("argv ({}):", request.args.len() + 1);
    println!("  [0] {program}");
    for (idx, arg) in request.args.iter().enumerate() {
        println!("  [{}] {}", idx + 1, arg.to_string_lossy());
    }

    debug!("dry-run complete (no launch)");
}
