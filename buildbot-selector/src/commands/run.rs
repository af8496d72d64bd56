//! Default command: resolve the builder, announce it, run it.

use std::io::{self, Write};

use anyhow::Result;
use selector_core::observability;
use selector_dispatch::{Environment, Registry};

/// Returns the child's exit code, or 0 for a dry run.
pub fn cmd_run(
    registry: &Registry,
    builder: Option<&str>,
    extra_args: &[String],
    dry_run: bool,
) -> Result<i32> {
    let ambient = Environment::from_process();
    let invocation = match selector_dispatch::resolve(registry, builder, &ambient, extra_args) {
        Ok(inv) => inv,
        Err(e) => {
            tracing::debug!(error = %e, "Builder resolution failed");
            observability::audit_execution_failed(builder, &e.to_string());
            return Err(e.into());
        }
    };

    // Flushed before spawning so the line precedes the child's own output.
    let mut out = io::stdout().lock();
    writeln!(out, "{} runs: {}", invocation.builder(), invocation.command_line())?;
    if dry_run {
        for change in ambient.changes(invocation.env()) {
            writeln!(out, "  {}", change)?;
        }
    }
    out.flush()?;
    drop(out);

    if dry_run {
        return Ok(0);
    }
    Ok(selector_dispatch::run(&invocation)?)
}
