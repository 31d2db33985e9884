//! Integration tests for the clipdown CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_clipdown"))
}

#[test]
fn test_basic_stdin() {
    cli()
        .write_stdin("<h2>Title</h2><p>Content</p>")
        .assert()
        .success()
        .stdout("## Title\n\nContent\n");
}

#[test]
fn test_file_input() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("selection.html");
    fs::write(&input_path, "<ul><li>First</li><li>Second</li></ul>").unwrap();

    cli()
        .arg(&input_path)
        .assert()
        .success()
        .stdout("* First\n* Second\n");
}

#[test]
fn test_dash_reads_stdin() {
    cli()
        .arg("-")
        .write_stdin("<ol><li>A</li><li>B</li></ol>")
        .assert()
        .success()
        .stdout("1. A\n2. B\n");
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out.md");

    cli()
        .arg("-o")
        .arg(&output_path)
        .write_stdin("<pre><code class=\"language-go\">fmt.Println()</code></pre>")
        .assert()
        .success()
        .stdout("");

    let output = fs::read_to_string(&output_path).unwrap();
    assert_eq!(output, "```go\nfmt.Println()\n```\n");
}

#[test]
fn test_empty_selection() {
    cli().write_stdin("   \n").assert().success().stdout("");
}

#[test]
fn test_json_response() {
    cli()
        .arg("--json")
        .write_stdin("<p>Hello world</p>")
        .assert()
        .success()
        .stdout("{\"markdown\":\"Hello world\"}\n");
}

#[test]
fn test_json_response_for_empty_selection() {
    cli()
        .arg("--json")
        .write_stdin("")
        .assert()
        .success()
        .stdout("{\"markdown\":\"\"}\n");
}

#[test]
fn test_link_style_flag() {
    let html = "<p>See <a href=\"https://example.com\">docs</a></p>";

    cli().write_stdin(html).assert().success().stdout("See docs\n");

    cli()
        .args(["--link-style", "inlined"])
        .write_stdin(html)
        .assert()
        .success()
        .stdout("See [docs](https://example.com)\n");
}

#[test]
fn test_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("clipdown.toml");
    fs::write(&config_path, "[markdown]\nbullet_list_marker = \"-\"\nhr = \"---\"\n").unwrap();

    cli()
        .arg("--config")
        .arg(&config_path)
        .write_stdin("<ul><li>a</li></ul><hr><p>b</p>")
        .assert()
        .success()
        .stdout("- a\n\n---\n\nb\n");
}

#[test]
fn test_flag_overrides_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("clipdown.toml");
    fs::write(&config_path, "[markdown]\nbullet_list_marker = \"-\"\n").unwrap();

    cli()
        .arg("--config")
        .arg(&config_path)
        .args(["--bullet", "+"])
        .write_stdin("<ul><li>a</li></ul>")
        .assert()
        .success()
        .stdout("+ a\n");
}

#[test]
fn test_missing_config_file() {
    cli()
        .args(["--config", "/nonexistent/clipdown.toml"])
        .write_stdin("<p>x</p>")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));
}

#[test]
fn test_malformed_request() {
    cli()
        .args(["--request", "not json"])
        .write_stdin("<p>x</p>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed message"));
}

#[test]
fn test_invalid_utf8_input() {
    cli()
        .write_stdin(vec![0xff, 0xfe, 0x00])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not UTF-8"));
}

#[test]
fn test_missing_input_file() {
    cli()
        .arg("/nonexistent/selection.html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
