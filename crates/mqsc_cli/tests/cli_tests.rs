//! End-to-end tests for the `mqsc` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

const ENVIRONMENTS: &str = "<environments>\
    <dev><queue><name>DEV.QUEUE1</name></queue></dev>\
    <prod><queue><name>PROD.QUEUE1</name></queue></prod>\
</environments>";

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A project with the conventional layout and one release group.
fn project() -> TempDir {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/main/resources/mq_env_config.xml", ENVIRONMENTS.as_bytes());
    write(
        dir.path(),
        "src/main/resources/release1/queues.mqsc",
        b"DEFINE QLOCAL(${queue.name})",
    );
    dir
}

fn mqsc(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mqsc").expect("Failed to locate mqsc binary");
    cmd.arg("--project-dir")
        .arg(project)
        .env_remove("MQ_ENVIRONMENT_CONFIG")
        .env_remove("MQSC_SETTINGS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_generate_writes_scripts() {
    let project = project();

    mqsc(project.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 4 script(s) for 2 environment(s)"));

    let out = project.path().join("target/generated_mqsc");
    assert_eq!(
        fs::read_to_string(out.join("dev/all-dev.mqsc")).unwrap(),
        "DEFINE QLOCAL(DEV.QUEUE1)"
    );
    assert_eq!(
        fs::read_to_string(out.join("prod/release1-prod.mqsc")).unwrap(),
        "DEFINE QLOCAL(PROD.QUEUE1)"
    );
}

#[test]
fn test_missing_configuration_exits_with_config_error() {
    let project = project();
    fs::remove_file(project.path().join("src/main/resources/mq_env_config.xml")).unwrap();

    mqsc(project.path())
        .arg("generate")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Environment configuration not found"));

    assert!(!project.path().join("target/generated_mqsc").exists());
}

#[test]
fn test_custom_configuration_path() {
    let project = project();
    write(
        project.path(),
        "config/other.xml",
        b"<envs><uat><queue><name>UAT.QUEUE1</name></queue></uat></envs>",
    );

    mqsc(project.path())
        .args(["generate", "--env-config", "config/other.xml"])
        .assert()
        .success();

    let out = project.path().join("target/generated_mqsc");
    assert!(out.join("uat/all-uat.mqsc").exists());
    assert!(!out.join("dev").exists());
}

#[test]
fn test_settings_file_is_picked_up() {
    let project = project();
    write(project.path(), "mqsc.yaml", b"output_dir: build/scripts\n");

    mqsc(project.path()).arg("generate").assert().success();

    assert!(project
        .path()
        .join("build/scripts/dev/release1-dev.mqsc")
        .exists());
}

#[cfg(unix)]
#[test]
fn test_unreadable_fragment_exits_with_partial_failure() {
    let project = project();
    std::os::unix::fs::symlink(
        project.path().join("gone.mqsc"),
        project.path().join("src/main/resources/broken.mqsc"),
    )
    .unwrap();

    mqsc(project.path()).arg("generate").assert().code(4);

    assert!(project
        .path()
        .join("target/generated_mqsc/dev/all-dev.mqsc")
        .exists());
}

#[test]
fn test_release_group_named_all_exits_with_invalid_args() {
    let project = project();
    write(project.path(), "src/main/resources/all/extra.mqsc", b"DEFINE QLOCAL(X)");

    mqsc(project.path())
        .arg("generate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("clashes with the combined scope name"));

    assert!(!project.path().join("target/generated_mqsc").exists());
}

#[test]
fn test_log_level_comes_from_rust_log() {
    let project = project();

    mqsc(project.path())
        .arg("generate")
        .env("RUST_LOG", "mqsc_core=debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("Engine state loading -> processing-all"));

    mqsc(project.path())
        .arg("generate")
        .assert()
        .success()
        .stderr(predicate::str::contains("Engine state").not());
}

#[test]
fn test_generate_json_report() {
    let project = project();

    let output = mqsc(project.path())
        .args(["generate", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["state"], "done");
    assert_eq!(report["environments"], serde_json::json!(["dev", "prod"]));
    assert_eq!(report["artifacts"].as_array().unwrap().len(), 4);
}

#[test]
fn test_inspect_writes_nothing() {
    let project = project();

    let output = mqsc(project.path())
        .args(["inspect", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["environments"][0]["name"], "dev");
    assert_eq!(plan["environments"][0]["keys"], 1);
    assert_eq!(plan["scopes"][0]["name"], "all");
    assert_eq!(plan["scopes"][1]["name"], "release1");
    assert!(!project.path().join("target").exists());
}
