//! Integration tests for the tfsummary CLI
//!
//! These tests verify CLI commands work correctly end-to-end.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Get the path to the tfsummary binary
fn tfsummary_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tfsummary"))
}

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path.to_string_lossy().to_string()
}

/// Command with an isolated home directory so no user config is picked up
fn command(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(tfsummary_binary());
    cmd.env("HOME", home.path())
        .env_remove("TFSUMMARY_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Run tfsummary and return output
fn run_tfsummary(args: &[&str]) -> std::process::Output {
    let home = tempfile::tempdir().unwrap();
    command(&home)
        .args(args)
        .output()
        .expect("Failed to execute tfsummary")
}

/// Drop ANSI escape sequences from styled output
fn strip_ansi(text: &str) -> String {
    let mut result = String::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

fn stdout(output: &std::process::Output) -> String {
    strip_ansi(&String::from_utf8_lossy(&output.stdout))
}

#[test]
fn test_tfsummary_version() {
    let output = run_tfsummary(&["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("tfsummary"));
}

#[test]
fn test_tfsummary_help() {
    let output = run_tfsummary(&["--help"]);

    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Usage:"));
    assert!(text.contains("Commands:"));
    assert!(text.contains("show"));
    assert!(text.contains("serve"));
}

#[test]
fn test_show_help_lists_filters() {
    let output = run_tfsummary(&["show", "--help"]);

    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("--action"));
    assert!(text.contains("--address"));
    assert!(text.contains("--show-unchanged"));
}

#[test]
fn test_show_renders_all_changes() {
    let plan = fixture("plan.json");
    let output = run_tfsummary(&["show", &plan, "--no-color"]);

    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Plan Summary:"));
    assert!(text.contains("+1 to add, ~1 to change, ±1 to replace, -1 to destroy, 1 to read"));
    assert!(text.contains("~ aws_instance.web (Update in place)"));
    assert!(text.contains("~ instance type = \"t3.micro\" -> \"t3.small\""));
    assert!(text.contains("+ aws_s3_bucket.logs (Create)"));
    assert!(text.contains("+ arn = (known after apply)"));
    assert!(text.contains("! module.database.aws_db_instance.main (Delete old before create new)"));
    assert!(text.contains("~ engine version = \"15.4\" -> \"16.2\""));
    assert!(text.contains("! aws_iam_role.legacy (Delete)"));
    assert!(text.contains("- name = \"legacy-role\""));
    assert!(text.contains("data.aws_caller_identity.current (Read)"));
    assert!(text.contains("aws_vpc.main (No change)"));
}

#[test]
fn test_show_masks_sensitive_values() {
    let plan = fixture("plan.json");

    let output = run_tfsummary(&["show", &plan]);
    let text = stdout(&output);
    assert!(text.contains("password = (sensitive) -> (sensitive)"));
    assert!(!text.contains("hunter2"));

    let output = run_tfsummary(&["show", &plan, "--show-sensitive"]);
    assert!(stdout(&output).contains("\"hunter2-old\" -> \"hunter2-new\""));
}

#[test]
fn test_show_hides_unchanged_attributes_by_default() {
    let plan = fixture("plan.json");

    let output = run_tfsummary(&["show", &plan]);
    let text = stdout(&output);
    assert!(!text.contains("ami = "));
    assert!(text.contains("(1 unchanged attribute hidden)"));

    let output = run_tfsummary(&["show", &plan, "--show-unchanged"]);
    assert!(stdout(&output).contains("ami = \"ami-0c55b159cbfafe1f0\""));
}

#[test]
fn test_show_filters_by_action() {
    let plan = fixture("plan.json");
    let output = run_tfsummary(&["show", &plan, "--action", "delete"]);

    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("aws_iam_role.legacy"));
    // replacements include a delete action
    assert!(text.contains("module.database.aws_db_instance.main"));
    assert!(!text.contains("aws_s3_bucket.logs"));
    assert!(!text.contains("aws_instance.web"));
    assert!(text.contains("4 of 6 resource changes hidden by filter (actions: delete)"));
}

#[test]
fn test_show_filters_by_repeated_and_comma_actions() {
    let plan = fixture("plan.json");
    let output = run_tfsummary(&["show", &plan, "-a", "create,read", "-a", "no-op"]);

    let text = stdout(&output);
    assert!(text.contains("aws_s3_bucket.logs"));
    assert!(text.contains("data.aws_caller_identity.current"));
    assert!(text.contains("aws_vpc.main"));
    assert!(!text.contains("aws_iam_role.legacy"));
}

#[test]
fn test_show_filters_by_address() {
    let plan = fixture("plan.json");
    let output = run_tfsummary(&["show", &plan, "--address", "DATABASE"]);

    let text = stdout(&output);
    assert!(text.contains("module.database.aws_db_instance.main"));
    assert!(!text.contains("aws_instance.web"));
}

#[test]
fn test_show_rejects_unknown_action() {
    let plan = fixture("plan.json");
    let output = run_tfsummary(&["show", &plan, "--action", "explode"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown action 'explode'"));
}

#[test]
fn test_show_json_format() {
    let plan = fixture("plan.json");
    let output = run_tfsummary(&["show", &plan, "--format", "json"]);

    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("show --format json prints JSON");
    assert_eq!(value["resources"].as_array().unwrap().len(), 6);
    assert_eq!(value["summary"]["to_replace"], 1);
    assert_eq!(
        value["resources"][1]["changes"]["arn"]["isAfterUnknown"],
        serde_json::Value::Bool(true)
    );
}

#[test]
fn test_show_reads_stdin() {
    let home = tempfile::tempdir().unwrap();
    let content = std::fs::read_to_string(fixture("plan.json")).unwrap();

    let mut child = command(&home)
        .args(["show", "-", "--action", "update"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("aws_instance.web (Update in place)"));
}

#[test]
fn test_show_missing_file_fails() {
    let output = run_tfsummary(&["show", "/definitely/not/here.json"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Could not load plan"));
}

#[test]
fn test_show_invalid_json_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let output = run_tfsummary(&["show", path.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to parse plan"));
}

#[test]
fn test_summary_command() {
    let plan = fixture("plan.json");
    let output = run_tfsummary(&["summary", &plan]);

    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Plan Summary"));
    assert!(text.contains("Terraform version: 1.7.5"));
    assert!(text.contains("To replace: 1"));
    assert!(text.contains("Unchanged: 1"));
    assert!(text.contains("4 resources will change"));
}

#[test]
fn test_modules_command() {
    let plan = fixture("plan.json");
    let output = run_tfsummary(&["modules", &plan, "--resources"]);

    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("root (2 resources)"));
    assert!(text.contains("module.database (1 resource)"));
    assert!(text.contains("module.database.aws_db_instance.main"));
    assert!(text.contains("Total resources: 3"));
}

#[test]
fn test_export_command_writes_html() {
    let plan = fixture("plan.json");
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("reports").join("plan.html");

    let output = run_tfsummary(&["export", &plan, "--output", out.to_str().unwrap()]);

    assert!(output.status.success());

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("<details class=\"resource danger\" open>"));
    assert!(html.contains("module.database.aws_db_instance.main"));
    assert!(!html.contains("hunter2"));
}

#[test]
fn test_config_file_sets_default_actions() {
    let plan = fixture("plan.json");
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    std::fs::write(&config, "view:\n  actions: [create]\n").unwrap();

    let output = run_tfsummary(&["show", &plan, "--config", config.to_str().unwrap()]);

    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("aws_s3_bucket.logs"));
    assert!(!text.contains("aws_iam_role.legacy"));
}

#[test]
fn test_missing_config_file_fails() {
    let plan = fixture("plan.json");
    let output = run_tfsummary(&["show", &plan, "--config", "/no/such/config.yaml"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config file not found"));
}
