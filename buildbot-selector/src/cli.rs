use std::path::PathBuf;

use clap::Parser;
use selector_core::config::env_keys::selector;

/// buildbot-selector - run the build script assigned to this sanitizer bot
#[derive(Parser, Debug)]
#[command(name = "buildbot-selector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Builder to run (normally set by the buildbot worker)
    #[arg(long, env = selector::BUILDER_NAME, value_name = "NAME")]
    pub builder: Option<String>,

    /// YAML registry to use instead of the built-in builder table
    #[arg(long, env = selector::REGISTRY, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Directory holding the build scripts (default: next to this executable)
    #[arg(long, env = selector::SCRIPT_DIR, value_name = "DIR")]
    pub script_dir: Option<PathBuf>,

    /// Resolve and print the command and environment changes without running anything
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// List registered builders and exit
    #[arg(long, default_value = "false", conflicts_with = "dry_run")]
    pub list: bool,

    /// Extra arguments appended to the builder's command. Use `--` before
    /// arguments that start with a dash.
    #[arg(
        value_name = "EXTRA_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub extra_args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_trailing_args_kept_in_order() {
        let cli = Cli::try_parse_from([
            "buildbot-selector",
            "--builder",
            "sanitizer-x86_64-linux",
            "--",
            "--stage",
            "2",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.builder.as_deref(), Some("sanitizer-x86_64-linux"));
        assert_eq!(cli.extra_args, vec!["--stage", "2", "-v"]);
    }

    #[test]
    fn test_hyphen_args_after_first_positional() {
        let cli = Cli::try_parse_from(["buildbot-selector", "--dry-run", "clean", "--fast"]).unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.extra_args, vec!["clean", "--fast"]);
    }

    #[test]
    fn test_list_conflicts_with_dry_run() {
        assert!(Cli::try_parse_from(["buildbot-selector", "--list", "--dry-run"]).is_err());
    }
}
