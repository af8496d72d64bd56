//! Builder dispatch: resolve a buildbot builder name to a command and a child
//! environment, then run it as a pass-through child process.

pub mod builtin;
pub mod dispatch;
pub mod environment;
pub mod registry;
pub mod registry_file;
pub mod runner;

pub use dispatch::{resolve, DispatchError, Invocation};
pub use environment::{EnvChange, Environment, BOT_DIR};
pub use registry::{BuilderEntry, CommandTemplate, EnvOverrides, Registry, RegistryError};
pub use runner::{run, RunnerError};
