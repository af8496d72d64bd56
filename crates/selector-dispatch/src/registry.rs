//! Builder registry: the two lookup tables an operator edits to add builders.
//!
//! The command table maps a builder name to its [`CommandTemplate`]; the
//! overrides table maps the same name to its [`EnvOverrides`]. Both are merged
//! into one immutable [`Registry`] at startup, and construction fails unless
//! the two tables name exactly the same builders.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

/// Per-builder environment overrides, applied on top of the ambient environment.
pub type EnvOverrides = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("builder '{0}' has a command but no environment entry")]
    MissingOverrides(String),

    #[error("builder '{0}' has an environment entry but no command")]
    OrphanOverrides(String),

    #[error("builder names must be non-empty")]
    EmptyBuilderName,

    #[error("builder '{0}' has an empty program")]
    EmptyProgram(String),

    #[error("failed to read registry file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid registry file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Executable plus fixed leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandTemplate {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `bash <script>`, the shape of every built-in builder.
    pub fn bash(script: impl Into<PathBuf>) -> Self {
        let script: PathBuf = script.into();
        Self::new("bash", vec![script.to_string_lossy().into_owned()])
    }
}

/// A validated registry row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderEntry {
    pub command: CommandTemplate,
    pub env: EnvOverrides,
}

/// Immutable name → (command, overrides) table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, BuilderEntry>,
}

impl Registry {
    /// Join the command table and the overrides table.
    ///
    /// A builder missing from either side is rejected rather than given an
    /// empty override set.
    pub fn from_tables(
        commands: BTreeMap<String, CommandTemplate>,
        mut overrides: BTreeMap<String, EnvOverrides>,
    ) -> Result<Self, RegistryError> {
        let mut entries = BTreeMap::new();
        for (name, command) in commands {
            if name.is_empty() {
                return Err(RegistryError::EmptyBuilderName);
            }
            if command.program.is_empty() {
                return Err(RegistryError::EmptyProgram(name));
            }
            let env = overrides
                .remove(&name)
                .ok_or_else(|| RegistryError::MissingOverrides(name.clone()))?;
            entries.insert(name, BuilderEntry { command, env });
        }
        if let Some(orphan) = overrides.into_keys().next() {
            return Err(RegistryError::OrphanOverrides(orphan));
        }
        tracing::debug!(builders = entries.len(), "Registry loaded");
        Ok(Self { entries })
    }

    pub fn get(&self, builder: &str) -> Option<&BuilderEntry> {
        self.entries.get(builder)
    }

    pub fn contains(&self, builder: &str) -> bool {
        self.entries.contains_key(builder)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BuilderEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
