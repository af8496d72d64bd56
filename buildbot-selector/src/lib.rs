//! buildbot-selector library: CLI parsing and command handlers behind the
//! `buildbot-selector` binary.

mod cli;
mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use selector_dispatch::{builtin, registry_file, Registry, RunnerError};

/// Parse args, dispatch, and return the exit code the process should report.
pub fn run_cli() -> Result<i32> {
    let cli = Cli::parse();
    selector_core::observability::init_tracing();

    let script_dir = resolve_script_dir(cli.script_dir.as_deref())?;
    let registry = load_registry(cli.registry.as_deref(), &script_dir)?;

    if cli.list {
        commands::list::cmd_list(&registry)?;
        return Ok(0);
    }

    commands::run::cmd_run(
        &registry,
        cli.builder.as_deref(),
        &cli.extra_args,
        cli.dry_run,
    )
}

/// Exit code for an error that escaped [`run_cli`].
///
/// Configuration errors are 1; spawn failures follow the shell's 127/126.
pub fn failure_exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<RunnerError>()
        .map(RunnerError::exit_code)
        .unwrap_or(1)
}

fn resolve_script_dir(cli_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = cli_dir {
        return Ok(dir.to_path_buf());
    }
    let exe = std::env::current_exe().context("Cannot locate the selector executable")?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

fn load_registry(path: Option<&Path>, script_dir: &Path) -> Result<Registry> {
    let registry = match path {
        Some(p) => registry_file::load_registry_file(p, script_dir)?,
        None => builtin::builtin_registry(script_dir)?,
    };
    tracing::debug!(
        builders = registry.len(),
        script_dir = %script_dir.display(),
        "Registry ready"
    );
    Ok(registry)
}
