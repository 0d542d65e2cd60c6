mod common; // Declare the common module

use assert_cmd::prelude::*;
use common::{defscan_cmd, TestHarness};
use predicates::prelude::*;
use std::fs;

fn sample_tree() -> TestHarness {
    let harness = TestHarness::new();
    harness.file("src/a.hh", "<?hh\nnamespace App;\nclass Foo {}\nfunction helper(): void {}\n");
    harness.file("src/b.hh", "<?hh\nfunction bar(): void {}\nconst int LIMIT = 1;\n");
    harness.file("src/notes.txt", "class NotCode {}");
    harness
}

#[test]
fn test_json_output_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let harness = sample_tree();

    let output = defscan_cmd().arg(harness.path("src")).output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let a = harness.path("src/a.hh");
    let b = harness.path("src/b.hh");
    assert_eq!(value["class"]["App\\Foo"], a.to_str().unwrap());
    assert_eq!(value["function"]["App\\helper"], a.to_str().unwrap());
    assert_eq!(value["function"]["bar"], b.to_str().unwrap());
    assert_eq!(value["constant"]["LIMIT"], b.to_str().unwrap());
    assert_eq!(value["type"], serde_json::json!({}));
    Ok(())
}

#[test]
fn test_no_args_uses_current_dir() -> Result<(), Box<dyn std::error::Error>> {
    let harness = sample_tree();

    defscan_cmd()
        .current_dir(harness.path("src"))
        .args(["--format", "names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("App\\Foo\t"))
        .stdout(predicate::str::contains("bar\t"));
    Ok(())
}

#[test]
fn test_include_categories_and_name_regex() -> Result<(), Box<dyn std::error::Error>> {
    let harness = sample_tree();

    defscan_cmd()
        .arg(harness.path("src"))
        .args(["--format", "names", "--include", "function", "--name-regex", "^b"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bar\t"))
        .stdout(predicate::str::contains("App\\Foo").not())
        .stdout(predicate::str::contains("helper").not());
    Ok(())
}

#[test]
fn test_exclude_name_regex() -> Result<(), Box<dyn std::error::Error>> {
    let harness = sample_tree();

    defscan_cmd()
        .arg(harness.path("src"))
        .args(["-f", "names", "-N", "^App\\\\"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bar\t"))
        .stdout(predicate::str::contains("App\\").not());
    Ok(())
}

#[test]
fn test_extension_filter() -> Result<(), Box<dyn std::error::Error>> {
    let harness = sample_tree();
    harness.file("src/legacy.php", "<?php\nclass Legacy {}\n");

    defscan_cmd()
        .arg(harness.path("src"))
        .args(["-f", "names", "--exclude-ext", "php"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Legacy").not())
        .stdout(predicate::str::contains("App\\Foo"));
    Ok(())
}

#[test]
fn test_output_file() -> Result<(), Box<dyn std::error::Error>> {
    let harness = sample_tree();
    let out = harness.path("autoload.json");

    defscan_cmd()
        .arg(harness.path("src"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&out)?;
    assert!(written.contains("\"App\\\\Foo\""));
    Ok(())
}

#[test]
fn test_missing_root_is_a_warning() -> Result<(), Box<dyn std::error::Error>> {
    let harness = sample_tree();

    defscan_cmd()
        .arg(harness.path("missing"))
        .arg(harness.path("src"))
        .args(["-f", "names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bar\t"))
        .stderr(predicate::str::contains("warning: Root"))
        .stderr(predicate::str::contains("missing"));
    Ok(())
}

#[test]
fn test_parse_failure_is_a_warning() -> Result<(), Box<dyn std::error::Error>> {
    let harness = sample_tree();
    harness.file("src/broken.hh", "<?hh\nclass Broken {\n");

    defscan_cmd()
        .arg(harness.path("src"))
        .args(["-f", "names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Broken").not())
        .stderr(predicate::str::contains("warning: Failed to parse"));
    Ok(())
}

#[test]
fn test_invalid_regex_fails() -> Result<(), Box<dyn std::error::Error>> {
    let harness = sample_tree();

    defscan_cmd()
        .arg(harness.path("src"))
        .args(["--regex", "("])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid path regex"));
    Ok(())
}

#[test]
fn test_unknown_category_fails() {
    defscan_cmd()
        .args(["--include", "struct"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"));
}
