//! YAML registry loaded at startup in place of the built-in table.
//!
//! ```yaml
//! assignments:
//!   my-builder:
//!     script: buildbot_cmake.sh
//! environment:
//!   my-builder:
//!     HAVE_NINJA: "1"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::registry::{CommandTemplate, EnvOverrides, Registry, RegistryError};

fn default_program() -> String {
    "bash".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssignmentSpec {
    #[serde(default = "default_program")]
    program: String,
    script: PathBuf,
    #[serde(default)]
    args: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    #[serde(default)]
    assignments: BTreeMap<String, AssignmentSpec>,
    #[serde(default)]
    environment: BTreeMap<String, Option<EnvOverrides>>,
}

/// Parse registry YAML. Relative scripts are resolved against `script_dir`.
pub fn parse_registry(
    content: &str,
    origin: &Path,
    script_dir: &Path,
) -> Result<Registry, RegistryError> {
    let file: RegistryFile =
        serde_yaml::from_str(content).map_err(|source| RegistryError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

    let commands = file
        .assignments
        .into_iter()
        .map(|(name, spec)| {
            let script = if spec.script.is_absolute() {
                spec.script
            } else {
                script_dir.join(spec.script)
            };
            let mut args = vec![script.to_string_lossy().into_owned()];
            args.extend(spec.args);
            (name, CommandTemplate::new(spec.program, args))
        })
        .collect();
    // `my-builder:` with no value is an explicit empty override set.
    let overrides = file
        .environment
        .into_iter()
        .map(|(name, env)| (name, env.unwrap_or_default()))
        .collect();

    Registry::from_tables(commands, overrides)
}

/// Read and parse a registry file.
pub fn load_registry_file(path: &Path, script_dir: &Path) -> Result<Registry, RegistryError> {
    let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Loading registry file");
    parse_registry(&content, path, script_dir)
}
