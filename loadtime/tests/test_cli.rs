//! Runs the `loadtime` binary against unit scripts on disk.

use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const HANDLED_HEADING: &str = "Load-time errors that were handled by units:";
const UNHANDLED_HEADING: &str = "Unhandled load failure:";

fn write(dir: &Path, relative: &str, body: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

/// app (package) -> app.util, requests -> urllib3
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app/mod.unit", "load app.util\nload requests\n");
    write(dir.path(), "app/util.unit", "# helpers\nsleep 1ms\n");
    write(
        dir.path(),
        "requests.unit",
        "load urllib3\ntry load chardet\n",
    );
    write(dir.path(), "urllib3.unit", "load sys\nsleep 2ms\n");
    write(
        dir.path(),
        "chardet.unit",
        "fail ImportError no module named cchardet\n",
    );
    dir
}

fn loadtime(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_loadtime"))
        .arg("--path")
        .arg(dir)
        .args(["--builtin", "sys", "--no-color", "-q"])
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_text_report() {
    let dir = project();
    let output = loadtime(dir.path(), &["app"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let first = stdout.lines().next().unwrap();
    assert!(first.contains("root"));
    assert!(first.contains("app"));
    assert!(stdout.contains("app.util"));
    assert!(stdout.contains("from requests"));
    assert!(!stdout.contains("\u{1b}["));
    let sys_row = |line: &str| line.trim_end().ends_with(" sys");
    assert!(!stdout.lines().any(sys_row));

    assert!(stdout.contains(HANDLED_HEADING));
    let chardet = "chardet: ImportError: no module named cchardet";
    assert!(stdout.contains(chardet));
    assert!(!stdout.contains(UNHANDLED_HEADING));
}

#[test]
fn test_top_limits_rows() {
    let dir = project();
    let output = loadtime(dir.path(), &["app", "--top", "2"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let table: Vec<&str> = stdout
        .lines()
        .take_while(|line| !line.is_empty())
        .collect();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_json_report() {
    let dir = project();
    let output = loadtime(dir.path(), &["app", "--json", "--summary"]);
    assert!(output.status.success());

    let report: JsonValue = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["root"], "app");
    assert!(report["total_seconds"].as_f64().unwrap() > 0.0);

    let records = report["records"].as_array().unwrap();
    let kind_of = |unit: &str| {
        records
            .iter()
            .find(|r| r["unit"] == unit)
            .map(|r| r["kind"].as_str().unwrap().to_owned())
            .unwrap()
    };
    assert_eq!(records.len(), 5);
    assert_eq!(kind_of("app"), "root");
    assert_eq!(kind_of("app.util"), "project");
    assert_eq!(kind_of("requests"), "dependency");
    assert_eq!(kind_of("urllib3"), "transitive");
    assert_eq!(kind_of("chardet"), "transitive");

    let errors = report["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["unit"], "chardet");
    assert_eq!(errors[0]["type"], "ImportError");
    assert_eq!(errors[0]["handled"], true);
    assert!(report["summary"].is_array());
}

#[test]
fn test_failing_root_exits_with_error_after_report() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app.unit", "load broken\n");
    write(dir.path(), "broken.unit", "fail ValueError boom\n");

    let output = loadtime(dir.path(), &["app"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains(HANDLED_HEADING));
    let section: Vec<&str> = stdout
        .lines()
        .skip_while(|line| *line != UNHANDLED_HEADING)
        .collect();
    assert_eq!(
        section,
        vec![
            UNHANDLED_HEADING,
            "broken: ValueError: boom",
            "app: ValueError: boom",
        ]
    );

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to load 'app'"));
    assert!(stderr.contains("boom"));
}

#[test]
fn test_failing_root_keeps_handled_errors_apart() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app.unit", "try load optional\nload broken\n");
    write(dir.path(), "optional.unit", "fail ImportError gone\n");
    write(dir.path(), "broken.unit", "fail ValueError boom\n");

    let output = loadtime(dir.path(), &["app", "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let report: JsonValue = serde_json::from_slice(&output.stdout).unwrap();
    let errors = report["errors"].as_array().unwrap();
    let units: Vec<&str> = errors.iter().map(|e| e["unit"].as_str().unwrap()).collect();
    let handled: Vec<bool> = errors.iter().map(|e| e["handled"] == true).collect();
    assert_eq!(units, vec!["optional", "broken", "app"]);
    assert_eq!(handled, vec![true, false, false]);
}

#[test]
fn test_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let output = loadtime(dir.path(), &["nowhere"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("nowhere"));
}

#[test]
fn test_invalid_unit_name_rejected_before_loading() {
    let dir = TempDir::new().unwrap();
    let output = loadtime(dir.path(), &["bad..name"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_export_writes_chrome_trace() {
    let dir = project();
    let trace_path = dir.path().join("trace.json");
    let trace_arg = trace_path.to_str().unwrap();
    let output = loadtime(dir.path(), &["app", "--export", trace_arg]);
    assert!(output.status.success());

    let text = fs::read_to_string(&trace_path).unwrap();
    let trace: JsonValue = serde_json::from_str(&text).unwrap();
    let events = trace["traceEvents"].as_array().unwrap();
    assert_eq!(events.len(), 5);
    assert!(events.iter().all(|e| e["ph"] == "X"));
    assert_eq!(events[0]["name"], "app");
    let ts: Vec<f64> = events.iter().map(|e| e["ts"].as_f64().unwrap()).collect();
    assert!(ts.windows(2).all(|pair| pair[0] <= pair[1]));
}
