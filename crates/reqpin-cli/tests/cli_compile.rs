use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A `reqpin` command isolated from the user's `~/.reqpin/config.toml`.
fn reqpin_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("reqpin").unwrap();
    cmd.env("REQPIN_HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_compile_prints_pinned_list_to_stdout() {
    let tmp = TempDir::new().unwrap();

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["compile", "flask==3.0.3", "click>=8"])
        .assert()
        .success()
        .stdout("flask==3.0.3\nclick>=8\n")
        .stderr(predicate::str::contains("Compiled 2 requirements"));
}

#[test]
fn test_compile_constraint_wins_over_requirement() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("constraints.txt"), "pkg==1.0.1\nother==2.0\n").unwrap();
    fs::write(tmp.path().join("requirements.txt"), "pkg==1.0.2\n").unwrap();

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["compile", "-c", "constraints.txt", "-r", "requirements.txt"])
        .assert()
        .success()
        .stdout("pkg==1.0.1\n");
}

#[test]
fn test_compile_double_requirement_fails() {
    let tmp = TempDir::new().unwrap();

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["compile", "pkg==1.0.1", "pkg==1.0.2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Double requirement given"));
}

#[test]
fn test_compile_allow_double_needs_constraints() {
    let tmp = TempDir::new().unwrap();

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["compile", "--allow-double", "pkg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--allow-double"));
}

#[test]
fn test_compile_missing_constraints_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("constraints.txt"), "other==2.0\n").unwrap();

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["compile", "-c", "constraints.txt", "pkg==1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing from constraints"));
}

#[test]
fn test_compile_writes_output_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("index.toml"),
        "[package.app]\ndependencies = [\"lib>=1\"]\n",
    )
    .unwrap();

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args([
            "compile",
            "--index",
            "index.toml",
            "-o",
            "pinned.txt",
            "-j",
            "graph.json",
            "app",
        ])
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        fs::read_to_string(tmp.path().join("pinned.txt")).unwrap(),
        "app\nlib>=1\n"
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("graph.json")).unwrap(),
        "{\n    \"app\": [\n        \"lib>=1\"\n    ]\n}\n"
    );
}

#[test]
fn test_compile_json_to_stdout() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("index.toml"),
        "[package.app]\ndependencies = [\"lib>=1\"]\n",
    )
    .unwrap();

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["compile", "--index", "index.toml", "-j", "-", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"app\": ["));
}

#[test]
fn test_compile_uses_config_index() {
    let tmp = TempDir::new().unwrap();
    let index = tmp.path().join("index.toml");
    fs::write(&index, "[package.app]\ndependencies = [\"lib\"]\n").unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        format!("[compile]\nindex = {:?}\n", index.display().to_string()),
    )
    .unwrap();

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["compile", "app"])
        .assert()
        .success()
        .stdout("app\nlib\n");

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["compile", "--flat", "app"])
        .assert()
        .success()
        .stdout("app\n");
}

#[test]
fn test_compile_invalid_requirement_fails() {
    let tmp = TempDir::new().unwrap();

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["compile", "pkg==="])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid version specifier"));
}
