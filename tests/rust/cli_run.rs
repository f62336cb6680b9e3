use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const MAIN: &str = r#"
[[require]]
label = "boot"
deps = ["db", "config"]

[[define]]
name = "config"
value = "prod"

[[include]]
url = "db.toml"
"#;

const DB: &str = r#"
[[define]]
name = "db"
deps = ["config"]
value = "connected"
"#;

#[test]
fn cli_run_follows_includes() {
    let dir = tempdir().expect("create tempdir");
    fs::write(dir.path().join("main.toml"), MAIN).expect("write main");
    fs::write(dir.path().join("db.toml"), DB).expect("write db");

    let mut cmd = Command::cargo_bin("esquire").expect("binary not found");
    cmd.current_dir(dir.path()).args(["run", "main.toml", "--strict"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"boot -> ["connected","prod"]"#))
        .stdout(predicate::str::contains("nothing waiting"));
}

#[test]
fn cli_run_directory_uses_main_manifest() {
    let dir = tempdir().expect("create tempdir");
    fs::write(
        dir.path().join("main.toml"),
        "[[define]]\nname = \"a\"\nvalue = 42\n\n[[require]]\ndeps = \"a\"\n",
    )
    .expect("write main");

    let mut cmd = Command::cargo_bin("esquire").expect("binary not found");
    cmd.current_dir(dir.path()).args(["run", "."]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("a -> [42]"));
}

#[test]
fn cli_run_strict_fails_on_waiting_modules() {
    let dir = tempdir().expect("create tempdir");
    fs::write(
        dir.path().join("main.toml"),
        "[[require]]\ndeps = [\"p\"]\n\n[[require]]\ndeps = [\"q\"]\n",
    )
    .expect("write main");

    let mut lenient = Command::cargo_bin("esquire").expect("binary not found");
    lenient.current_dir(dir.path()).args(["run", "main.toml"]);
    lenient
        .assert()
        .success()
        .stdout(predicate::str::contains("still waiting: p,q"));

    let mut strict = Command::cargo_bin("esquire").expect("binary not found");
    strict.current_dir(dir.path()).args(["run", "main.toml", "--strict"]);
    strict
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unresolved modules: p,q"));
}

#[test]
fn cli_run_reports_failed_includes() {
    let dir = tempdir().expect("create tempdir");
    fs::write(
        dir.path().join("main.toml"),
        "[[require]]\ndeps = \"db\"\n\n[[include]]\nurl = \"missing.toml\"\n",
    )
    .expect("write main");

    let mut cmd = Command::cargo_bin("esquire").expect("binary not found");
    cmd.current_dir(dir.path()).args(["run", "main.toml"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Error loading module:"))
        .stdout(predicate::str::contains("still waiting: db"));
}

#[test]
fn cli_run_debug_logs_resolver_passes() {
    let dir = tempdir().expect("create tempdir");
    fs::write(
        dir.path().join("main.toml"),
        "[[require]]\ndeps = [\"x\"]\n\n[[define]]\nname = \"x\"\nvalue = 1\n",
    )
    .expect("write main");

    let mut cmd = Command::cargo_bin("esquire").expect("binary not found");
    cmd.current_dir(dir.path()).args(["run", "main.toml", "--debug"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("required: x"))
        .stdout(predicate::str::contains("resolved: x"));
}

#[test]
fn cli_run_missing_manifest_fails() {
    let dir = tempdir().expect("create tempdir");

    let mut cmd = Command::cargo_bin("esquire").expect("binary not found");
    cmd.current_dir(dir.path()).args(["run", "nope.toml"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Manifest not found"));
}
