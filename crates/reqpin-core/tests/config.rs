use reqpin_core::config::{dirs_path, GlobalConfig};
use tempfile::TempDir;

#[test]
fn test_global_config_defaults() {
    let config = GlobalConfig::default();
    assert!(!config.compile.allow_double);
    assert!(!config.compile.flat);
    assert!(config.compile.index.is_none());
    assert!(config.environment.is_empty());
}

#[test]
fn test_global_config_parse_from_toml() {
    let toml = r#"
[compile]
allow-double = true
flat = true
index = "/srv/index.toml"

[environment]
python_version = "3.9"
sys_platform = "win32"
"#;
    let config: GlobalConfig = toml::from_str(toml).unwrap();
    assert!(config.compile.allow_double);
    assert!(config.compile.flat);
    assert_eq!(config.compile.index.as_deref(), Some("/srv/index.toml"));

    let env = config.marker_environment();
    assert_eq!(env.get("python_version"), Some("3.9"));
    assert_eq!(env.get("python_full_version"), Some("3.9.0"));
    assert_eq!(env.get("sys_platform"), Some("win32"));
}

#[test]
fn test_load_from_missing_file_is_default() {
    let tmp = TempDir::new().unwrap();
    let config = GlobalConfig::load_from(&tmp.path().join("config.toml")).unwrap();
    assert!(!config.compile.allow_double);
}

#[test]
fn test_load_from_invalid_file_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[compile]\nflat = \"yes\"\n").unwrap();
    let err = GlobalConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Configuration error"), "got: {err}");
}

#[test]
fn test_dirs_path_ends_with_reqpin_or_override() {
    let path = dirs_path();
    match std::env::var("REQPIN_HOME") {
        Ok(dir) => assert_eq!(path, std::path::PathBuf::from(dir)),
        Err(_) => assert!(path.ends_with(".reqpin")),
    }
}
