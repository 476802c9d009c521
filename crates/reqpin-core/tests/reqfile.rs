use std::fs;

use reqpin_core::reqfile::{read_requirements_file, RequirementLine};
use reqpin_core::requirement::Provenance;
use reqpin_util::errors::ReqpinError;
use tempfile::TempDir;

#[test]
fn test_reads_entries_with_line_provenance() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("requirements.txt");
    fs::write(&path, "# deps\nrequests>=2\n\n-e git+https://h/tool.git#egg=tool\n").unwrap();

    let lines = read_requirements_file(&path, false).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "requests>=2");
    assert_eq!(
        lines[0].origin,
        Provenance::RequirementsFile {
            path: path.clone(),
            line: 2
        }
    );
    assert!(lines[1].editable);
    assert!(!lines[1].constraint);
    assert_eq!(lines[1].origin.to_string(), format!("-r {} (line 4)", path.display()));
}

#[test]
fn test_constraints_file_marks_entries_as_constraints() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("constraints.txt");
    fs::write(&path, "pkg==1.0.1\n").unwrap();

    let lines = read_requirements_file(&path, true).unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].constraint);
    let req = lines[0].parse().unwrap();
    assert!(req.is_constraint());
    assert_eq!(req.origin().to_string(), format!("-c {} (line 1)", path.display()));
}

#[test]
fn test_nested_includes_follow_relative_paths() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("sub")).unwrap();
    fs::write(tmp.path().join("sub").join("base.txt"), "six\n").unwrap();
    fs::write(tmp.path().join("sub").join("pins.txt"), "six==1.16.0\n").unwrap();
    let top = tmp.path().join("requirements.txt");
    fs::write(
        &top,
        "-r sub/base.txt\n--constraint=sub/pins.txt\n--index-url https://mirror\nattrs\n",
    )
    .unwrap();

    let lines = read_requirements_file(&top, false).unwrap();
    let summary: Vec<(&str, bool)> = lines
        .iter()
        .map(|l| (l.text.as_str(), l.constraint))
        .collect();
    assert_eq!(
        summary,
        vec![("six", false), ("six==1.16.0", true), ("attrs", false)]
    );
}

#[test]
fn test_include_cycle_is_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "-r b.txt\n").unwrap();
    fs::write(tmp.path().join("b.txt"), "-r a.txt\n").unwrap();

    let err = read_requirements_file(&tmp.path().join("a.txt"), false).unwrap_err();
    assert!(matches!(err, ReqpinError::Parse { .. }), "got: {err}");
}

#[test]
fn test_same_file_included_twice_is_not_a_cycle() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("common.txt"), "six\n").unwrap();
    fs::write(tmp.path().join("top.txt"), "-r common.txt\n-r common.txt\n").unwrap();

    let lines = read_requirements_file(&tmp.path().join("top.txt"), false).unwrap();
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = read_requirements_file(&tmp.path().join("absent.txt"), false).unwrap_err();
    assert!(matches!(err, ReqpinError::Io(_)));
}

#[test]
fn test_command_line_entries() {
    let line = RequirementLine::command_line("./src/pkg", true);
    let req = line.parse().unwrap();
    assert!(req.is_editable());
    assert!(req.name().is_none());
    assert_eq!(req.origin(), &Provenance::CommandLine);
}
