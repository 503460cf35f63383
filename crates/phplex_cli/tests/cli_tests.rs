//! End-to-end tests of the `phplex` binary.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn phplex(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_phplex"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn source_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

fn path_of(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_missing_argument_exits_with_one() {
    let output = phplex(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Usage"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_help_exits_with_zero() {
    let output = phplex(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("--format"));
}

#[test]
fn test_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.php");
    let missing = missing.to_str().unwrap();
    let output = phplex(&[missing]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output).lines().next(),
        Some(format!("Cannot open input file: {missing}").as_str())
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn test_text_report() {
    let file = source_file(b"<?php $x = 5; ?>");
    let output = phplex(&[path_of(&file)]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("Token(PHPTagOpen, \"<?php\", Line: 1, Col: 1)"));
    assert!(out.contains("Token(Variable, \"$x\", Line: 1, Col: 7)\n"));
    assert!(out.contains("Token(PHPTagClose, \"?>\", Line: 1, Col: 15)\n"));
    assert!(out.contains("\n\n--- Hierarchical Structure ---\n"));
    assert!(out.ends_with("-----------------------------\n"));
    assert!(output.stderr.is_empty());
}

#[test]
fn test_lexical_error_keeps_exit_status_zero() {
    let file = source_file(b"<?php $x = \"abc");
    let output = phplex(&[path_of(&file)]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stderr(&output),
        "Lexical Error (1:12): Unterminated string\n"
    );
    let out = stdout(&output);
    assert_eq!(out.matches("Token(").count(), 6);
}

#[test]
fn test_view_toggles() {
    let file = source_file(b"<p>hi</p>");
    let table = stdout(&phplex(&["--no-tree", path_of(&file)]));
    assert_eq!(table, "Token(HTMLText, \"<p>hi</p>\", Line: 1, Col: 1)\n");

    let tree = stdout(&phplex(&["--no-table", path_of(&file)]));
    assert_eq!(
        tree,
        "--- Hierarchical Structure ---\n<p>hi</p>\n-----------------------------\n"
    );
}

#[test]
fn test_json_report() {
    let file = source_file(b"<?php /* open");
    let output = phplex(&["--format", "json", path_of(&file)]);
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["tokens"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["tokens"][0]["kind"], "PHPTagOpen");
    assert_eq!(value["diagnostics"][0]["code"], 1002);
    assert_eq!(value["diagnostics"][0]["column"], 7);
}

#[test]
fn test_unknown_format_is_a_usage_error() {
    let file = source_file(b"");
    let output = phplex(&["--format", "xml", path_of(&file)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_pretty_renders_after_scanning() {
    let file = source_file(b"<?php\n$a = 'oops;\n");
    let output = phplex(&["--pretty", path_of(&file)]);
    assert_eq!(output.status.code(), Some(0));
    let err = stderr(&output);
    assert!(!err.contains("Lexical Error"));
    assert!(err.contains("Unterminated string"));
    assert!(err.contains("PL1001"));
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let file = source_file(b"<p>\xff</p>");
    let output = phplex(&["--no-tree", path_of(&file)]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "Token(HTMLText, \"<p>\u{FFFD}</p>\", Line: 1, Col: 1)\n"
    );
}
