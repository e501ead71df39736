use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn descriptor_cmd(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("build-descriptor").expect("bin");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("BUILD_DESCRIPTOR_CONFIG")
        .env_remove("BUILD_VERSION_NAME")
        .env_remove("BUILD_LOCAL_PROPERTIES")
        .env_remove("SOURCE_DATE_EPOCH");
    cmd
}

#[test]
fn placeholders_mirror_version_name_and_code() {
    let tmp = tempdir().expect("tempdir");

    descriptor_cmd(tmp.path())
        .args([
            "placeholders",
            "--now",
            "1700000000",
            "--version-name",
            "1.2.3",
        ])
        .assert()
        .success()
        .stdout(contains("- APP_VERSION=1.2.3\n"))
        .stdout(contains("- BUILD_NUMBER=1700000000\n"));
}

#[test]
fn placeholders_json_report() {
    let tmp = tempdir().expect("tempdir");

    let output = descriptor_cmd(tmp.path())
        .args(["placeholders", "--json", "--now", "42", "--version-name", "0.9.0"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["command"], "placeholders");
    assert_eq!(
        report["details"],
        serde_json::json!(["APP_VERSION=0.9.0", "BUILD_NUMBER=42"])
    );
}

#[test]
fn placeholders_fail_without_version_name() {
    let tmp = tempdir().expect("tempdir");

    descriptor_cmd(tmp.path())
        .args(["placeholders", "--now", "42"])
        .assert()
        .failure()
        .stderr(contains("code=E001_MISSING_INPUT"));
}
