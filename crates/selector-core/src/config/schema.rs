//! 按领域分组的配置结构体
//!
//! 从环境变量加载，统一 fallback 逻辑。

use super::env_keys::observability as obv_keys;
use super::loader::{env_bool, env_optional, env_or};

/// Default filter when neither `RUST_LOG` nor the level variable is set.
pub const DEFAULT_LOG_LEVEL: &str = "buildbot_selector=warn,selector_dispatch=warn";

/// 可观测性配置：quiet、log_level、log_json、audit_log
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
    pub audit_log: Option<String>,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            let quiet = env_bool(obv_keys::QUIET, obv_keys::QUIET_ALIASES, false);
            let log_level = env_or(obv_keys::LOG_LEVEL, obv_keys::LOG_LEVEL_ALIASES, || {
                DEFAULT_LOG_LEVEL.to_string()
            });
            let log_json = env_bool(obv_keys::LOG_JSON, obv_keys::LOG_JSON_ALIASES, false);
            let audit_log = env_optional(obv_keys::AUDIT_LOG, obv_keys::AUDIT_LOG_ALIASES);
            Self {
                quiet,
                log_level,
                log_json,
                audit_log,
            }
        })
    }

    /// Filter directive handed to `EnvFilter` when `RUST_LOG` is absent.
    pub fn filter_directive(&self) -> String {
        if self.quiet {
            "buildbot_selector=warn,selector_dispatch=warn".to_string()
        } else {
            self.log_level.clone()
        }
    }
}
