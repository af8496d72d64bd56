//! Built-in sanitizer bot table.

use std::collections::BTreeMap;
use std::path::Path;

use crate::environment::BOT_DIR;
use crate::registry::{CommandTemplate, EnvOverrides, Registry, RegistryError};

/// Builder → script, run as `bash <script_dir>/<script>`.
const BOT_ASSIGNMENT: &[(&str, &str)] = &[
    ("sanitizer-ppc64le-linux", "buildbot_cmake.sh"),
    ("sanitizer-ppc64be-linux", "buildbot_cmake.sh"),
    ("sanitizer-x86_64-linux", "buildbot_cmake.sh"),
    ("sanitizer-x86_64-linux-fast", "buildbot_fast.sh"),
    ("sanitizer-x86_64-linux-autoconf", "buildbot_standard.sh"),
    ("sanitizer-x86_64-linux-fuzzer", "buildbot_fuzzer.sh"),
    ("sanitizer-x86_64-linux-android", "buildbot_android.sh"),
    ("sanitizer-x86_64-linux-bootstrap-asan", "buildbot_bootstrap_asan.sh"),
    ("sanitizer-x86_64-linux-bootstrap-msan", "buildbot_bootstrap_msan.sh"),
    ("sanitizer-x86_64-linux-bootstrap-ubsan", "buildbot_bootstrap_ubsan.sh"),
    ("sanitizer-x86_64-linux-qemu", "buildbot_qemu.sh"),
    ("sanitizer-aarch64-linux-fuzzer", "buildbot_fuzzer.sh"),
    ("sanitizer-aarch64-linux-bootstrap-asan", "buildbot_bootstrap_asan.sh"),
    ("sanitizer-aarch64-linux-bootstrap-hwasan", "buildbot_bootstrap_hwasan.sh"),
    ("sanitizer-aarch64-linux-bootstrap-msan", "buildbot_bootstrap_msan.sh"),
    ("sanitizer-aarch64-linux-bootstrap-ubsan", "buildbot_bootstrap_ubsan.sh"),
];

const PPC_ENV: &[(&str, &str)] = &[("HAVE_NINJA", "1"), ("CHECK_LIBCXX", "0"), ("CHECK_LLD", "0")];

/// Builder → extra environment. Every builder in [`BOT_ASSIGNMENT`] appears here.
fn bot_additional_env() -> BTreeMap<String, EnvOverrides> {
    let qemu_image_dir = format!("{}/qemu_image", BOT_DIR);
    let table: Vec<(&str, Vec<(&str, &str)>)> = vec![
        ("sanitizer-ppc64le-linux", PPC_ENV.to_vec()),
        ("sanitizer-ppc64be-linux", PPC_ENV.to_vec()),
        ("sanitizer-x86_64-linux", vec![("HAVE_NINJA", "1")]),
        ("sanitizer-x86_64-linux-fast", vec![]),
        ("sanitizer-x86_64-linux-autoconf", vec![]),
        ("sanitizer-x86_64-linux-fuzzer", vec![]),
        ("sanitizer-x86_64-linux-android", vec![]),
        ("sanitizer-x86_64-linux-bootstrap-asan", vec![]),
        ("sanitizer-x86_64-linux-bootstrap-msan", vec![]),
        ("sanitizer-x86_64-linux-bootstrap-ubsan", vec![]),
        ("sanitizer-x86_64-linux-qemu", vec![("QEMU_IMAGE_DIR", qemu_image_dir.as_str())]),
        ("sanitizer-aarch64-linux-fuzzer", vec![]),
        ("sanitizer-aarch64-linux-bootstrap-asan", vec![]),
        ("sanitizer-aarch64-linux-bootstrap-hwasan", vec![]),
        ("sanitizer-aarch64-linux-bootstrap-msan", vec![]),
        ("sanitizer-aarch64-linux-bootstrap-ubsan", vec![]),
    ];
    table
        .into_iter()
        .map(|(name, vars)| {
            let env = vars
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            (name.to_string(), env)
        })
        .collect()
}

/// Registry of the sanitizer bots, with scripts resolved against `script_dir`.
pub fn builtin_registry(script_dir: &Path) -> Result<Registry, RegistryError> {
    let commands = BOT_ASSIGNMENT
        .iter()
        .map(|(name, script)| {
            (
                name.to_string(),
                CommandTemplate::bash(script_dir.join(script)),
            )
        })
        .collect();
    Registry::from_tables(commands, bot_additional_env())
}
