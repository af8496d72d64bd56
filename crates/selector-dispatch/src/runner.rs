//! Pass-through child process runner.
//!
//! Spawns exactly one child with the invocation's argv and environment,
//! attached to the parent's stdin/stdout/stderr, waits for it and hands back
//! its exit status. No timeout, no capture, no retry.

use std::io;
use std::process::{Command, ExitStatus};
use std::time::Instant;

use selector_core::observability;
use thiserror::Error;

use crate::dispatch::Invocation;

/// Exit code for a program that does not exist (shell convention).
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit code for a program that exists but cannot be executed.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn '{program}' for builder '{builder}'")]
    Spawn {
        builder: String,
        program: String,
        #[source]
        source: io::Error,
    },
}

impl RunnerError {
    /// Exit status the selector reports for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Spawn { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => EXIT_NOT_FOUND,
                io::ErrorKind::PermissionDenied => EXIT_NOT_EXECUTABLE,
                _ => 1,
            },
        }
    }
}

/// Run `invocation` to completion and return the child's exit code.
///
/// The child's environment is exactly `invocation.env()`. A child killed by
/// a signal reports `128 + signo`.
pub fn run(invocation: &Invocation) -> Result<i32, RunnerError> {
    let mut cmd = Command::new(invocation.program());
    cmd.args(invocation.args())
        .env_clear()
        .envs(invocation.env().iter());

    observability::audit_execution_started(
        invocation.builder(),
        invocation.program(),
        invocation.args(),
    );
    let start = Instant::now();

    let status = cmd.status().map_err(|source| {
        observability::audit_execution_failed(Some(invocation.builder()), &source.to_string());
        RunnerError::Spawn {
            builder: invocation.builder().to_string(),
            program: invocation.program().to_string(),
            source,
        }
    })?;

    let code = exit_code_of(status);
    let duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        builder = %invocation.builder(),
        exit_code = code,
        duration_ms,
        "Builder finished"
    );
    observability::audit_execution_completed(invocation.builder(), code, duration_ms);
    Ok(code)
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    if let Some(code) = status.code() {
        return code;
    }
    match status.signal() {
        Some(signo) => {
            let name = nix::sys::signal::Signal::try_from(signo)
                .map(|s| s.as_str())
                .unwrap_or("unknown signal");
            tracing::warn!(signal = signo, name, "Builder terminated by signal");
            128 + signo
        }
        None => 1,
    }
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
