use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

/// Table used by most tests.
fn write_table(dir: &Path, name: &str) -> PathBuf {
    let yaml = r#"command: demo
help: true
version: true
options:
  - { short: "-a", long: "--all", multiple: true }
  - { short: "-n", long: "--number", kind: required }
  - { long: "--color", kind: optional }
  - { short: "-D", long: "--define", kind: take_two_args, multiple: true }
"#;
    let path = dir.join(name);
    fs::write(&path, yaml).expect("failed to write table");
    path
}

fn run(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_options-trace"))
        .args(args)
        .output()
        .expect("failed to run options-trace")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_reports_options_and_positionals() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "demo.yaml");

    let out = run(&[
        "parse",
        "--table",
        table.to_str().unwrap(),
        "--",
        "-aan",
        "3",
        "file",
        "-D",
        "k",
        "v",
        "--color=always",
    ]);
    assert!(out.status.success(), "parse should succeed");

    let report = stdout_json(&out);
    assert_eq!(report["command"], "demo");
    assert_eq!(report["mode"], "interleaved");
    assert_eq!(report["outcome"], "parsed");

    let matches = &report["matches"];
    assert_eq!(matches["positional"], serde_json::json!(["file"]));
    let names: Vec<&str> = matches["occurrences"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["--all", "--all", "--number", "--define", "--color"]);
    assert_eq!(matches["occurrences"][3]["values"], serde_json::json!(["k", "v"]));
}

#[test]
fn parse_posix_mode_override() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "demo.yaml");

    let out = run(&[
        "parse",
        "--table",
        table.to_str().unwrap(),
        "--mode",
        "posix",
        "--",
        "-a",
        "file",
        "-a",
    ]);
    assert!(out.status.success());

    let report = stdout_json(&out);
    assert_eq!(report["mode"], "posix");
    assert_eq!(
        report["matches"]["positional"],
        serde_json::json!(["file", "-a"])
    );
}

#[test]
fn parse_subcommand_without_subcommand_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "demo.yaml");

    let out = run(&[
        "parse",
        "--table",
        table.to_str().unwrap(),
        "--mode",
        "subcommand",
        "--",
        "-a",
    ]);
    assert_eq!(out.status.code(), Some(2));

    let report = stdout_json(&out);
    assert_eq!(report["outcome"], "rejected");
    assert_eq!(report["error"], "no subcommand was provided");
}

#[test]
fn parse_help_exits_successfully() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "demo.yaml");

    let out = run(&["parse", "--table", table.to_str().unwrap(), "--", "-ah"]);
    assert!(out.status.success(), "help is not an invalid command line");
    assert_eq!(stdout_json(&out)["outcome"], "help_requested");

    let out = run(&["parse", "--table", table.to_str().unwrap(), "--", "--version"]);
    assert!(out.status.success());
    assert_eq!(stdout_json(&out)["outcome"], "version_requested");
}

#[test]
fn parse_unknown_option_exits_with_usage_code() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "demo.yaml");

    let out = run(&["parse", "--table", table.to_str().unwrap(), "--", "--bogus"]);
    assert_eq!(out.status.code(), Some(2));

    let report = stdout_json(&out);
    assert_eq!(report["error"], "unknown option \"--bogus\"");
    assert!(report.get("matches").is_none());
}

#[test]
fn parse_yaml_output() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "demo.yaml");

    let out = run(&[
        "parse",
        "--table",
        table.to_str().unwrap(),
        "--format",
        "yaml",
        "--",
        "-n",
    ]);
    assert_eq!(out.status.code(), Some(2));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("outcome: rejected"), "stdout: {stdout}");
    assert!(
        stdout.contains("option -n requires an argument"),
        "stdout: {stdout}"
    );
}

#[test]
fn parse_missing_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.yaml");

    let out = run(&["parse", "--table", missing.to_str().unwrap(), "--", "-a"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Failed to load"), "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_good_tables() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = write_table(dir.path(), "demo.yaml");
    let json = dir.path().join("other.json");
    fs::write(
        &json,
        r#"{"command": "other", "mode": "posix", "options": [{"short": "-q"}]}"#,
    )
    .unwrap();

    let out = run(&["validate", yaml.to_str().unwrap(), json.to_str().unwrap()]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Validated 2 option table(s)."), "stdout: {stdout}");
}

#[test]
fn validate_rejects_reserved_option() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(
        &path,
        "command: bad\nhelp: true\noptions:\n  - { short: \"-h\", long: \"--host\", kind: required }\n",
    )
    .unwrap();

    let out = run(&["validate", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("option -h collides with a built-in option"),
        "stderr: {stderr}"
    );
}
