//! Observability: tracing init and the execution audit log.
//!
//! Uses config::ObservabilityConfig for BUILDBOT_SELECTOR_QUIET, LOG_LEVEL, LOG_JSON, AUDIT_LOG.
//! Log output goes to stderr; stdout is reserved for the "<builder> runs: <cmd>" line.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use serde_json::json;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

static AUDIT_PATH: Mutex<Option<String>> = Mutex::new(None);

/// Initialize tracing. Call at process startup.
/// When BUILDBOT_SELECTOR_QUIET=1, only WARN and above are logged.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let level = cfg.filter_directive();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

fn get_audit_path() -> Option<String> {
    {
        let guard = AUDIT_PATH.lock().ok()?;
        if let Some(ref p) = *guard {
            return Some(p.clone());
        }
    }
    let path = ObservabilityConfig::from_env().audit_log.clone()?;
    if let Some(parent) = Path::new(&path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    {
        let mut guard = AUDIT_PATH.lock().ok()?;
        *guard = Some(path.clone());
    }
    Some(path)
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub(crate) fn append_jsonl(path: &Path, record: &serde_json::Value) {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(mut f) => {
            if let Ok(line) = serde_json::to_string(record) {
                let _ = writeln!(f, "{}", line);
            }
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot open audit log");
        }
    }
}

/// Audit: execution_started (right before spawn)
pub fn audit_execution_started(builder: &str, program: &str, args: &[String]) {
    if let Some(path) = get_audit_path() {
        let record = json!({
            "ts": now(),
            "event": "execution_started",
            "builder": builder,
            "program": program,
            "args": args,
        });
        append_jsonl(Path::new(&path), &record);
    }
}

/// Audit: execution_completed
pub fn audit_execution_completed(builder: &str, exit_code: i32, duration_ms: u64) {
    if let Some(path) = get_audit_path() {
        let record = json!({
            "ts": now(),
            "event": "execution_completed",
            "builder": builder,
            "exit_code": exit_code,
            "duration_ms": duration_ms,
            "success": exit_code == 0,
        });
        append_jsonl(Path::new(&path), &record);
    }
}

/// Audit: the builder could not be resolved or the child could not be spawned
pub fn audit_execution_failed(builder: Option<&str>, reason: &str) {
    if let Some(path) = get_audit_path() {
        let record = json!({
            "ts": now(),
            "event": "execution_failed",
            "builder": builder,
            "reason": reason,
        });
        append_jsonl(Path::new(&path), &record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_jsonl_one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        append_jsonl(&path, &json!({"event": "execution_started", "builder": "a"}));
        append_jsonl(&path, &json!({"event": "execution_completed", "exit_code": 3}));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["exit_code"], 3);
    }

    #[test]
    fn test_append_jsonl_unwritable_path_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for append.
        append_jsonl(dir.path(), &json!({"event": "x"}));
    }
}
