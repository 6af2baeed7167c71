use std::path::Path;
use std::process::{Command, Output};

fn lcom_cmd(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lcom"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run lcom")
}

fn write_project(dir: &Path) {
    std::fs::create_dir_all(dir.join("pkg")).unwrap();
    std::fs::write(
        dir.join("pkg/point.py"),
        r#"
class Point:
    def __init__(self, x, y):
        self.x = x
        self.y = y

    def norm(self):
        return self.x + self.y

    def flip(self):
        return self.y - self.x
"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("pkg/split.py"),
        r#"
class Split:
    def a(self):
        return self.x

    def b(self):
        return self.y
"#,
    )
    .unwrap();
}

#[test]
fn test_scores_a_project_tree() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let output = lcom_cmd(&["."], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "lcom failed: {stdout}");
    assert!(stdout.contains("pkg.point.Point"), "missing class: {stdout}");
    assert!(stdout.contains("pkg.split.Split"), "missing class: {stdout}");
    assert!(stdout.contains("Average"), "missing footer: {stdout}");
    assert!(stdout.contains("1.50"), "wrong average: {stdout}");
}

#[test]
fn test_json_printer() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let output = lcom_cmd(&[".", "--printer", "json"], dir.path());
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let summary: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(summary["algorithm"], "LCOM4");
    assert_eq!(summary["classes"].as_array().unwrap().len(), 2);
    assert_eq!(summary["average"], 1.5);
}

#[test]
fn test_filter_restricts_files() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let output = lcom_cmd(&[".", "--filter", "point"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("pkg.point.Point"));
    assert!(!stdout.contains("pkg.split.Split"));
}

#[test]
fn test_unparsable_file_is_skipped_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    std::fs::write(dir.path().join("pkg/broken.py"), "class (:\n").unwrap();

    let output = lcom_cmd(&["."], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "batch should continue: {stderr}");
    assert!(stderr.contains("Warning"), "expected warning: {stderr}");
    assert!(stdout.contains("pkg.point.Point"));
}

#[test]
fn test_config_excludes_are_honored() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    std::fs::write(
        dir.path().join(".lcom.toml"),
        "exclude_patterns = [\"**/split.py\"]\n",
    )
    .unwrap();

    let output = lcom_cmd(&["."], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("pkg.point.Point"));
    assert!(!stdout.contains("pkg.split.Split"));
}

#[test]
fn test_single_file_argument() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let output = lcom_cmd(&["pkg/split.py"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("pkg.split.Split"));
    assert!(!stdout.contains("pkg.point.Point"));
}

#[test]
fn test_unknown_algorithm_is_a_hard_error() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let output = lcom_cmd(&[".", "--algorithm", "LCOM1"], dir.path());
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("unknown algorithm"));
}
