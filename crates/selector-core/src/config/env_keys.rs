//! 环境变量 key 常量与别名定义
//!
//! 主变量优先使用 `BUILDBOT_SELECTOR_*`，兼容旧的 `SANITIZER_BOT_*`。

/// Selector inputs
pub mod selector {
    /// Builder name assigned by the buildbot master. Required, no default.
    pub const BUILDER_NAME: &str = "BUILDBOT_BUILDERNAME";

    /// Optional YAML registry replacing the built-in table.
    pub const REGISTRY: &str = "BUILDBOT_SELECTOR_REGISTRY";

    /// Directory holding the build scripts.
    pub const SCRIPT_DIR: &str = "BUILDBOT_SELECTOR_SCRIPT_DIR";
}

/// Variables the selector writes into (or strips from) the child environment
pub mod bot {
    pub const BOT_DIR: &str = "BOT_DIR";
    pub const TMPDIR: &str = "TMPDIR";
}

/// 可观测性与日志
pub mod observability {
    pub const QUIET: &str = "BUILDBOT_SELECTOR_QUIET";
    pub const QUIET_ALIASES: &[&str] = &["SANITIZER_BOT_QUIET"];

    pub const LOG_LEVEL: &str = "BUILDBOT_SELECTOR_LOG_LEVEL";
    pub const LOG_LEVEL_ALIASES: &[&str] = &["SANITIZER_BOT_LOG_LEVEL"];

    pub const LOG_JSON: &str = "BUILDBOT_SELECTOR_LOG_JSON";
    pub const LOG_JSON_ALIASES: &[&str] = &[];

    pub const AUDIT_LOG: &str = "BUILDBOT_SELECTOR_AUDIT_LOG";
    pub const AUDIT_LOG_ALIASES: &[&str] = &["SANITIZER_BOT_AUDIT_LOG"];
}
