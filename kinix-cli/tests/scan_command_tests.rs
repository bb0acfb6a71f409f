//! End-to-end tests for `kinix scan` and `kinix rules`.
//!
//! Runs the compiled binary against temporary files and checks output and exit codes.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn kinix(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kinix"))
        .arg("--config")
        .arg(config)
        .args(["--output", "json", "--log-level", "error"])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("kinix binary should run")
}

fn write_config(dir: &TempDir, extra: &str) -> std::path::PathBuf {
    let path = dir.path().join("kinix.toml");
    let report_dir = dir.path().join("reports");
    std::fs::write(
        &path,
        format!(
            "[general]\nlog_level = \"error\"\nreport_dir = \"{}\"\n{extra}",
            report_dir.display()
        ),
    )
    .expect("should write config");
    path
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_scan_clean_file_exits_zero() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_config(&dir, "");
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "nothing to see here\n").expect("write");

    let output = kinix(&config, &["scan", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output);
    assert_eq!(json["summary"]["safe"], 1);
    assert_eq!(json["results"][0]["format"], "generic");
    assert_eq!(json["results"][0]["tier"], "safe");
}

#[test]
fn test_scan_critical_resource_report_exits_four() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_config(&dir, "");
    let file = dir.path().join("syscare.txt");
    std::fs::write(
        &file,
        "=== REPORTE SYSCARE ===\ncpu_percent: 96.0\nram_percent: 40.0\n",
    )
    .expect("write");

    let output = kinix(&config, &["scan", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));

    let json = stdout_json(&output);
    assert_eq!(json["results"][0]["format"], "resource_monitor");
    assert_eq!(json["results"][0]["tier"], "critical");
}

#[test]
fn test_scan_fail_on_override() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_config(&dir, "");
    let file = dir.path().join("access.log");
    std::fs::write(&file, "GET /?id=1 union select password\n").expect("write");

    let default_run = kinix(&config, &["scan", file.to_str().unwrap()]);
    assert_eq!(default_run.status.code(), Some(0), "medium is below critical");

    let strict = kinix(
        &config,
        &["scan", file.to_str().unwrap(), "--fail-on", "medium"],
    );
    assert_eq!(strict.status.code(), Some(4));
}

#[test]
fn test_scan_save_writes_reports() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_config(&dir, "");
    let a = dir.path().join("a.csv");
    let b = dir.path().join("b.txt");
    std::fs::write(&a, "IP,MAC,VENDOR\n10.0.0.5,AA:BB:CC:00:11:22,Acme\n").expect("write");
    std::fs::write(&b, "hello\n").expect("write");

    let output = kinix(
        &config,
        &[
            "scan",
            a.to_str().unwrap(),
            b.to_str().unwrap(),
            "--save",
            "--save-format",
            "text",
        ],
    );
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output);
    let saved = json["saved"].as_array().expect("saved paths");
    assert_eq!(saved.len(), 2);

    let mut names: Vec<String> = std::fs::read_dir(dir.path().join("reports"))
        .expect("report dir should exist")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert!(names[0].starts_with("kinix_report_") && names[0].ends_with("_1.txt"));
    assert!(names[1].ends_with("_2.txt"));
}

#[test]
fn test_scan_missing_file_exits_ten() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_config(&dir, "");
    let output = kinix(&config, &["scan", "/nonexistent/input.log"]);
    assert_eq!(output.status.code(), Some(10));
}

#[test]
fn test_scan_oversized_file_is_command_error() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_config(&dir, "[forensic]\nmax_file_size = 8\n");
    let file = dir.path().join("big.log");
    std::fs::write(&file, "0123456789abcdef").expect("write");

    let output = kinix(&config, &["scan", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("file too large"));
}

#[test]
fn test_invalid_config_exits_two() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("kinix.toml");
    std::fs::write(&config, "[forensic]\nworkers = 9999\n").expect("write");

    let output = kinix(&config, &["config", "validate"]);
    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["valid"], false);
}

#[test]
fn test_rules_list_builtin() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_config(&dir, "");

    let output = kinix(&config, &["rules", "list"]);
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output);
    assert_eq!(json["source"], "built-in");
    let names: Vec<&str> = json["rules"]
        .as_array()
        .expect("rules array")
        .iter()
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert!(names.contains(&"SQL Injection"));
    assert!(names.contains(&"Malicious Macro"));
}

#[test]
fn test_rules_validate_reports_bad_file() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_config(&dir, "");
    let rules = dir.path().join("rules");
    std::fs::create_dir(&rules).expect("mkdir");
    std::fs::write(rules.join("bad.yml"), "id: only-id\n").expect("write");

    let output = kinix(&config, &["rules", "validate", rules.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["invalid_files"], 1);
}
