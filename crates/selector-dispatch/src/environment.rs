//! Child environment composition.
//!
//! The ambient environment is captured once into an [`Environment`] value and
//! passed around explicitly; the live process environment is never mutated.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

use selector_core::config::env_keys::bot;

use crate::registry::EnvOverrides;

/// Base working directory injected into every child as `BOT_DIR`.
pub const BOT_DIR: &str = "/b";

/// Snapshot of a process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        std::env::vars_os().collect()
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn contains(&self, key: impl AsRef<OsStr>) -> bool {
        self.vars.contains_key(key.as_ref())
    }

    pub fn set(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: impl AsRef<OsStr>) -> Option<OsString> {
        self.vars.remove(key.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Build the effective child environment: ambient, then `BOT_DIR`, then
    /// the builder's overrides (later wins), then `TMPDIR` removed.
    pub fn compose(&self, overrides: &EnvOverrides) -> Self {
        let mut env = self.clone();
        env.set(bot::BOT_DIR, BOT_DIR);
        for (key, value) in overrides {
            env.set(key, value);
        }
        env.remove(bot::TMPDIR);
        env
    }

    /// Variables that differ between `self` (ambient) and `effective`.
    pub fn changes(&self, effective: &Environment) -> Vec<EnvChange> {
        let mut changes = Vec::new();
        for (key, value) in effective.iter() {
            if self.get(key) != Some(value) {
                changes.push(EnvChange::Set(key.to_owned(), value.to_owned()));
            }
        }
        for (key, _) in self.iter() {
            if !effective.contains(key) {
                changes.push(EnvChange::Unset(key.to_owned()));
            }
        }
        changes
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<OsString>,
    V: Into<OsString>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One difference between the ambient and the effective environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvChange {
    Set(OsString, OsString),
    Unset(OsString),
}

impl std::fmt::Display for EnvChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Set(k, v) => write!(f, "set {}={}", k.to_string_lossy(), v.to_string_lossy()),
            Self::Unset(k) => write!(f, "unset {}", k.to_string_lossy()),
        }
    }
}
