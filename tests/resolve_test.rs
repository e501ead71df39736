use assert_cmd::Command;
use predicates::str::contains;
use std::path::Path;
use tempfile::tempdir;

const SCRUBBED_ENV: &[&str] = &[
    "BUILD_DESCRIPTOR_CONFIG",
    "BUILD_DESCRIPTOR_LOG",
    "BUILD_APPLICATION_ID",
    "BUILD_VERSION_NAME",
    "BUILD_MIN_SDK",
    "BUILD_TARGET_SDK",
    "BUILD_COMPILE_SDK",
    "BUILD_NDK_VERSION",
    "BUILD_VARIANT",
    "BUILD_LANGUAGE_LEVEL",
    "BUILD_SIGNING_CONFIG",
    "BUILD_SHRINK_RULES",
    "BUILD_LOCAL_PROPERTIES",
    "SOURCE_DATE_EPOCH",
];

fn descriptor_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("build-descriptor").expect("bin");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"));
    for var in SCRUBBED_ENV {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn resolve_reference_example() {
    let tmp = tempdir().expect("tempdir");

    descriptor_cmd(tmp.path())
        .args([
            "resolve",
            "--now",
            "1700000000",
            "--version-name",
            "1.2.3",
            "--min-sdk",
            "21",
            "--target-sdk",
            "34",
        ])
        .assert()
        .success()
        .stdout(contains("application_id=com.fede22dev.beauty_center"))
        .stdout(contains("version_code=1700000000"))
        .stdout(contains("version_name=1.2.3"))
        .stdout(contains("toolchain.language_level=11"))
        .stdout(contains("release.minify_enabled=false"));
}

#[test]
fn version_code_wraps_to_zero_at_two_billion() {
    let tmp = tempdir().expect("tempdir");

    descriptor_cmd(tmp.path())
        .args(["resolve", "--now", "2000000000", "--version-name", "1.0.0"])
        .assert()
        .success()
        .stdout(contains("version_code=0\n"));
}

#[test]
fn empty_version_name_fails_with_config_error() {
    let tmp = tempdir().expect("tempdir");

    descriptor_cmd(tmp.path())
        .args([
            "resolve",
            "--now",
            "100",
            "--version-name",
            "",
            "--min-sdk",
            "21",
            "--target-sdk",
            "34",
        ])
        .assert()
        .code(1)
        .stderr(contains("E002_EMPTY_VERSION_NAME"));
}

#[test]
fn missing_version_name_fails_with_config_error() {
    let tmp = tempdir().expect("tempdir");

    descriptor_cmd(tmp.path())
        .args(["resolve", "--now", "100"])
        .assert()
        .failure()
        .stderr(contains("E001_MISSING_INPUT"))
        .stderr(contains("versionName"));
}

#[test]
fn negative_sdk_fails_with_config_error() {
    let tmp = tempdir().expect("tempdir");

    descriptor_cmd(tmp.path())
        .args([
            "resolve",
            "--now",
            "100",
            "--version-name",
            "1.0.0",
            "--min-sdk",
            "-1",
        ])
        .assert()
        .failure()
        .stderr(contains("E003_NEGATIVE_SDK"))
        .stderr(contains("minSdk"));
}

#[test]
fn source_date_epoch_drives_version_code() {
    let tmp = tempdir().expect("tempdir");

    descriptor_cmd(tmp.path())
        .env("SOURCE_DATE_EPOCH", "2000000005")
        .args(["resolve", "--version-name", "1.0.0"])
        .assert()
        .success()
        .stdout(contains("version_code=5\n"))
        .stdout(contains("(SOURCE_DATE_EPOCH)"));
}

#[test]
fn wall_clock_version_code_is_in_range() {
    let tmp = tempdir().expect("tempdir");

    let output = descriptor_cmd(tmp.path())
        .args(["--json", "resolve", "--version-name", "1.0.0"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["command"], "resolve");
    assert_eq!(report["ok"], true);
    let code = report["details"]
        .as_array()
        .expect("details")
        .iter()
        .filter_map(|d| d.as_str())
        .find_map(|d| d.strip_prefix("version_code="))
        .expect("version_code detail")
        .parse::<u64>()
        .expect("numeric version code");
    assert!(code < 2_000_000_000);
}

#[test]
fn hardened_variant_flag_switches_toolchain() {
    let tmp = tempdir().expect("tempdir");

    descriptor_cmd(tmp.path())
        .args([
            "resolve",
            "--now",
            "1",
            "--version-name",
            "1.0.0",
            "--variant",
            "hardened",
        ])
        .assert()
        .success()
        .stdout(contains("variant=hardened"))
        .stdout(contains("toolchain.language_level=17"))
        .stdout(contains(
            "release.shrink_rules=proguard-android-optimize.txt,proguard-rules.pro",
        ));
}

#[test]
fn language_level_env_pins_toolchain() {
    let tmp = tempdir().expect("tempdir");

    descriptor_cmd(tmp.path())
        .env("BUILD_LANGUAGE_LEVEL", "17")
        .args(["resolve", "--now", "1", "--version-name", "1.0.0"])
        .assert()
        .success()
        .stdout(contains("variant=standard"))
        .stdout(contains("toolchain.language_level=17"));
}
