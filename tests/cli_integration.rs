/*!
 * Integration tests for the extcopy binary
 */

use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn extcopy() -> Command {
    Command::new(env!("CARGO_BIN_EXE_extcopy"))
}

#[test]
fn test_missing_source_creates_nothing() {
    let temp_dir = tempdir().unwrap();

    let output = extcopy()
        .current_dir(temp_dir.path())
        .arg("does-not-exist")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Source folder does not exist: does-not-exist"));

    // Default destination must not have been created
    assert!(!temp_dir.path().join("destination").exists());
}

#[test]
fn test_excess_arguments_rejected() {
    let temp_dir = tempdir().unwrap();
    fs::create_dir(temp_dir.path().join("src")).unwrap();

    let output = extcopy()
        .current_dir(temp_dir.path())
        .args(["src", "dest", "extra"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!temp_dir.path().join("dest").exists());
}

#[test]
fn test_copy_and_print_tree() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    fs::create_dir_all(src.join("a").join("b")).unwrap();
    fs::write(src.join("a").join("report.txt"), "report").unwrap();
    fs::write(src.join("a").join("b").join("photo.jpg"), "photo").unwrap();
    fs::write(src.join("data.txt"), "data").unwrap();

    let output = extcopy()
        .current_dir(temp_dir.path())
        .args(["src", "--no-color", "--report", "none"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = "\
destination
├── jpg
│   └── photo.jpg
└── txt
    ├── data.txt
    └── report.txt
";
    assert_eq!(stdout, expected);

    let dest = temp_dir.path().join("destination");
    assert_eq!(fs::read_to_string(dest.join("txt").join("report.txt")).unwrap(), "report");
    assert_eq!(fs::read_to_string(dest.join("jpg").join("photo.jpg")).unwrap(), "photo");
}

#[test]
fn test_json_report() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("Makefile"), "all:").unwrap();

    let output = extcopy()
        .current_dir(temp_dir.path())
        .args(["src", "out", "--no-color", "--report", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json_start = stdout.find('{').unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();

    assert_eq!(value["files_copied"], 1);
    assert_eq!(value["buckets"]["no_extension"]["files"], 1);
    assert!(temp_dir.path().join("out").join("no_extension").join("Makefile").exists());
}
