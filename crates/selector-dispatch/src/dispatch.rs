//! Builder name → runnable [`Invocation`].

use thiserror::Error;

use crate::environment::Environment;
use crate::registry::Registry;

/// Configuration errors: the selector exits 1 and spawns nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unset/invalid builder name (BUILDBOT_BUILDERNAME is not set)")]
    MissingBuilderName,

    #[error("unset/invalid builder name '{0}'")]
    UnknownBuilder(String),
}

/// A fully resolved command: argv plus the complete child environment.
#[derive(Debug, Clone)]
pub struct Invocation {
    builder: String,
    program: String,
    args: Vec<String>,
    env: Environment,
}

impl Invocation {
    pub fn builder(&self) -> &str {
        &self.builder
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Template arguments followed by the caller's extra arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// The argv as one POSIX shell line, each token quoted only when needed.
    ///
    /// Used for display only; execution never goes through a shell.
    pub fn command_line(&self) -> String {
        let words =
            std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        match shlex::try_join(words.clone()) {
            Ok(line) => line,
            // Only NUL bytes are unquotable; show them raw.
            Err(_) => words.collect::<Vec<_>>().join(" "),
        }
    }
}

/// Resolve `builder` against `registry`.
///
/// `ambient` is the caller's snapshot of the environment; `extra_args` are
/// appended in order after the template's own arguments.
pub fn resolve(
    registry: &Registry,
    builder: Option<&str>,
    ambient: &Environment,
    extra_args: &[String],
) -> Result<Invocation, DispatchError> {
    let name = match builder {
        Some(name) if !name.is_empty() => name,
        _ => return Err(DispatchError::MissingBuilderName),
    };
    let entry = registry
        .get(name)
        .ok_or_else(|| DispatchError::UnknownBuilder(name.to_string()))?;

    let mut args = entry.command.args.clone();
    args.extend(extra_args.iter().cloned());

    tracing::debug!(
        builder = %name,
        overrides = entry.env.len(),
        extra_args = extra_args.len(),
        "Resolved builder"
    );

    Ok(Invocation {
        builder: name.to_string(),
        program: entry.command.program.clone(),
        args,
        env: ambient.compose(&entry.env),
    })
}
