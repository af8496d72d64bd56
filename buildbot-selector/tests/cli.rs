#![cfg(unix)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn selector(script_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("buildbot-selector").unwrap();
    cmd.env_remove("BUILDBOT_BUILDERNAME")
        .env_remove("BUILDBOT_SELECTOR_REGISTRY")
        .env_remove("BUILDBOT_SELECTOR_AUDIT_LOG")
        .env_remove("RUST_LOG")
        .arg("--script-dir")
        .arg(script_dir);
    cmd
}

/// Script that dumps its environment into the file named by its first argument.
const DUMP_ENV: &str = "env > \"$1\"\n";

fn write_script(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

#[test]
fn test_sanitizer_x86_64_linux_environment() {
    let dir = TempDir::new().unwrap();
    write_script(dir.path(), "buildbot_cmake.sh", DUMP_ENV);
    let out = dir.path().join("env.txt");

    selector(dir.path())
        .env("BUILDBOT_BUILDERNAME", "sanitizer-x86_64-linux")
        .env("TMPDIR", "/tmp")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "sanitizer-x86_64-linux runs: bash ",
        ));

    let env = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = env.lines().collect();
    assert!(lines.contains(&"HAVE_NINJA=1"), "{env}");
    assert!(lines.contains(&"BOT_DIR=/b"), "{env}");
    assert!(!lines.iter().any(|l| l.starts_with("TMPDIR=")), "{env}");
}

#[test]
fn test_qemu_image_dir() {
    let dir = TempDir::new().unwrap();
    write_script(dir.path(), "buildbot_qemu.sh", DUMP_ENV);
    let out = dir.path().join("env.txt");

    selector(dir.path())
        .env("BUILDBOT_BUILDERNAME", "sanitizer-x86_64-linux-qemu")
        .arg(&out)
        .assert()
        .success();

    let env = fs::read_to_string(&out).unwrap();
    assert!(env.lines().any(|l| l == "QEMU_IMAGE_DIR=/b/qemu_image"), "{env}");
}

#[test]
fn test_unknown_builder_exits_1_without_spawning() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("ran");
    for script in ["buildbot_cmake.sh", "buildbot_fast.sh"] {
        write_script(dir.path(), script, &format!("touch {}\n", marker.display()));
    }

    selector(dir.path())
        .env("BUILDBOT_BUILDERNAME", "not-a-real-builder")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "ERROR - unset/invalid builder name",
        ));

    assert!(!marker.exists());
}

#[test]
fn test_missing_builder_name_exits_1() {
    let dir = TempDir::new().unwrap();
    selector(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unset/invalid builder name"));
}

#[test]
fn test_child_exit_code_passed_through() {
    let dir = TempDir::new().unwrap();
    write_script(dir.path(), "buildbot_fast.sh", "exit 7\n");

    selector(dir.path())
        .env("BUILDBOT_BUILDERNAME", "sanitizer-x86_64-linux-fast")
        .assert()
        .code(7);
}

#[test]
fn test_extra_args_appended_in_order() {
    let dir = TempDir::new().unwrap();
    write_script(
        dir.path(),
        "buildbot_fuzzer.sh",
        "out=$1; shift; printf '%s\\n' \"$@\" > \"$out\"\n",
    );
    let out = dir.path().join("args.txt");

    selector(dir.path())
        .env("BUILDBOT_BUILDERNAME", "sanitizer-aarch64-linux-fuzzer")
        .arg("--")
        .arg(&out)
        .arg("--stage=2")
        .arg("two words")
        .arg("last")
        .assert()
        .success();

    let args = fs::read_to_string(&out).unwrap();
    assert_eq!(args, "--stage=2\ntwo words\nlast\n");
}

#[test]
fn test_dry_run_does_not_spawn() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("ran");
    write_script(
        dir.path(),
        "buildbot_cmake.sh",
        &format!("touch {}\n", marker.display()),
    );

    selector(dir.path())
        .env("BUILDBOT_BUILDERNAME", "sanitizer-ppc64le-linux")
        .env("TMPDIR", "/tmp")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("sanitizer-ppc64le-linux runs: bash "))
        .stdout(predicate::str::contains("set CHECK_LLD=0"))
        .stdout(predicate::str::contains("unset TMPDIR"));

    assert!(!marker.exists());
}

#[test]
fn test_list_builtin_builders() {
    let dir = TempDir::new().unwrap();
    let assert = selector(dir.path()).arg("--list").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 16);
    assert!(stdout.contains("sanitizer-aarch64-linux-bootstrap-hwasan: bash "));
}

#[test]
fn test_registry_file() {
    let dir = TempDir::new().unwrap();
    write_script(dir.path(), "custom.sh", DUMP_ENV);
    let registry = dir.path().join("registry.yaml");
    fs::write(
        &registry,
        "assignments:\n  custom-bot:\n    script: custom.sh\nenvironment:\n  custom-bot:\n    CUSTOM: \"yes\"\n",
    )
    .unwrap();
    let out = dir.path().join("env.txt");

    selector(dir.path())
        .env("BUILDBOT_SELECTOR_REGISTRY", &registry)
        .env("BUILDBOT_BUILDERNAME", "custom-bot")
        .arg(&out)
        .assert()
        .success();

    let env = fs::read_to_string(&out).unwrap();
    assert!(env.lines().any(|l| l == "CUSTOM=yes"), "{env}");
    assert!(env.lines().any(|l| l == "BOT_DIR=/b"), "{env}");

    // Built-in builders are not visible once a registry file is used.
    selector(dir.path())
        .env("BUILDBOT_SELECTOR_REGISTRY", &registry)
        .env("BUILDBOT_BUILDERNAME", "sanitizer-x86_64-linux")
        .assert()
        .code(1);
}

#[test]
fn test_registry_out_of_sync_is_config_error() {
    let dir = TempDir::new().unwrap();
    let registry = dir.path().join("registry.yaml");
    fs::write(&registry, "assignments:\n  a:\n    script: a.sh\n").unwrap();

    selector(dir.path())
        .arg("--registry")
        .arg(&registry)
        .env("BUILDBOT_BUILDERNAME", "a")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("has a command but no environment entry"));
}

#[test]
fn test_missing_program_exits_127() {
    let dir = TempDir::new().unwrap();
    let registry = dir.path().join("registry.yaml");
    fs::write(
        &registry,
        "assignments:\n  ghost:\n    program: /nonexistent/interpreter\n    script: x.sh\nenvironment:\n  ghost:\n",
    )
    .unwrap();

    selector(dir.path())
        .arg("--registry")
        .arg(&registry)
        .env("BUILDBOT_BUILDERNAME", "ghost")
        .assert()
        .code(127)
        .stderr(predicate::str::contains("failed to spawn '/nonexistent/interpreter'"));
}

#[test]
fn test_audit_log_records_run() {
    let dir = TempDir::new().unwrap();
    write_script(dir.path(), "buildbot_fast.sh", "exit 0\n");
    let audit = dir.path().join("audit").join("selector.jsonl");

    selector(dir.path())
        .env("BUILDBOT_BUILDERNAME", "sanitizer-x86_64-linux-fast")
        .env("BUILDBOT_SELECTOR_AUDIT_LOG", &audit)
        .assert()
        .success();

    let log = fs::read_to_string(&audit).unwrap();
    let events: Vec<&str> = log.lines().collect();
    assert_eq!(events.len(), 2);
    assert!(events[0].contains("\"execution_started\""));
    assert!(events[1].contains("\"execution_completed\""));
    assert!(events[1].contains("\"exit_code\":0"));
}
