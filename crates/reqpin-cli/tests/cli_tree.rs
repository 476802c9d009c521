use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn reqpin_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("reqpin").unwrap();
    cmd.env("REQPIN_HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

fn write_index(tmp: &TempDir) {
    fs::write(
        tmp.path().join("index.toml"),
        r#"
[package.app]
dependencies = ["web>=2", "db"]

[package.web]
dependencies = ["http"]
"#,
    )
    .unwrap();
}

#[test]
fn test_tree_prints_dependencies() {
    let tmp = TempDir::new().unwrap();
    write_index(&tmp);

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["tree", "--index", "index.toml", "app"])
        .assert()
        .success()
        .stdout("app\n├── web>=2\n│   └── http\n└── db\n");
}

#[test]
fn test_tree_depth_limit() {
    let tmp = TempDir::new().unwrap();
    write_index(&tmp);

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["tree", "--index", "index.toml", "--depth", "1", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http").not());
}

#[test]
fn test_tree_why() {
    let tmp = TempDir::new().unwrap();
    write_index(&tmp);

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["tree", "--index", "index.toml", "--why", "http", "app"])
        .assert()
        .success()
        .stdout("Path to http:\napp\n  web>=2\n    http\nRequired by: web>=2\n");

    reqpin_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["tree", "--index", "index.toml", "--why", "nothing", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found"));
}
