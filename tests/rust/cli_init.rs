use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn cli_init_writes_config_and_manifest() {
    let dir = tempdir().expect("create tempdir");

    let mut cmd = Command::cargo_bin("esquire").expect("binary not found");
    cmd.args(["init", "--dir"]).arg(dir.path());
    cmd.assert().success();

    let config = std::fs::read_to_string(dir.path().join("esquire.toml")).expect("config");
    assert!(config.contains("[resolver]"));
    assert!(config.contains("compact = true"));
    assert!(dir.path().join("main.toml").exists());

    // initialized manifest resolves on its own
    let mut run = Command::cargo_bin("esquire").expect("binary not found");
    run.current_dir(dir.path()).args(["run", "main.toml", "--strict"]);
    run.assert()
        .success()
        .stdout(predicate::str::contains(r#"boot -> [{"config":{"env":"dev"}}]"#));
}

#[test]
fn cli_init_refuses_existing_project() {
    let dir = tempdir().expect("create tempdir");
    std::fs::write(dir.path().join("esquire.toml"), "").expect("write config");

    let mut cmd = Command::cargo_bin("esquire").expect("binary not found");
    cmd.args(["init", "--dir"]).arg(dir.path());
    cmd.assert().failure();
}
