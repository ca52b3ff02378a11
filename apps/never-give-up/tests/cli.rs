//! Integration tests for the never-give-up binary.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Runs in `dir` with no env overrides leaking in from the host.
fn cmd_in(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("never-give-up");
    cmd.current_dir(dir)
        .env_remove("NEVER_GIVE_UP_PROMPTS_DIR")
        .env_remove("NEVER_GIVE_UP_DEFAULT_LANGUAGE")
        .env_remove("NEVER_GIVE_UP_SAMPLING")
        .env_remove("NEVER_GIVE_UP_LOG_LEVEL")
        .env_remove("NEVER_GIVE_UP_LOG_JSON")
        .env_remove("RUST_LOG");
    cmd
}

fn write_definition(root: &Path, tier: &str, folder: &str, body: &str) {
    let dir = root.join(tier).join(folder);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("tool.md"), body).unwrap();
}

const DEFINITION: &str = "---\ntitle: Stuck\n---\n## System Prompt\nYou are helping.\n\n## Guidance Bullets\n- one\n- two\n";

#[test]
fn test_list_shows_builtin_tools() {
    let temp = TempDir::new().unwrap();
    cmd_in(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("list_scenarios"))
        .stdout(predicate::str::contains("bug-fix-always-failed"))
        .stdout(predicate::str::contains("generate_clarifying_questions"))
        .stdout(predicate::str::contains("scope-creep"));
}

#[test]
fn test_list_json_in_chinese() {
    let temp = TempDir::new().unwrap();
    let out = cmd_in(temp.path())
        .args(["list", "--json", "--language", "zh-CN"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let scenarios = v["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 6);
    let scope = scenarios.iter().find(|s| s["id"] == "scope-creep").unwrap();
    assert_eq!(scope["title"], "范围不断扩大");
}

#[test]
fn test_check_builtin_succeeds() {
    let temp = TempDir::new().unwrap();
    cmd_in(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("6 scenarios (5 core, 1 extended)"));
}

#[test]
fn test_check_prompts_dir_with_tier_override() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("prompts");
    write_definition(&root, "core", "stuck", DEFINITION);
    write_definition(&root, "extended", "stuck", DEFINITION);
    write_definition(&root, "extended", "wandering", DEFINITION);

    cmd_in(temp.path())
        .args(["check", "--prompts-dir", root.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("The core version will be used."))
        .stdout(predicate::str::contains("2 scenarios (1 core, 1 extended)"));
}

#[test]
fn test_check_fails_on_bad_folder() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("prompts");
    write_definition(&root, "core", "stuck", DEFINITION);
    write_definition(&root, "core", "Bad_Name", DEFINITION);

    cmd_in(temp.path())
        .args(["check", "--prompts-dir", root.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Bad_Name"))
        .stdout(predicate::str::contains("1 error(s)"));
}

#[test]
fn test_check_reads_dirs_from_local_config() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("defs");
    write_definition(&root, "core", "stuck", DEFINITION);
    std::fs::write(
        temp.path().join("never-give-up.json"),
        serde_json::json!({ "prompts": { "dirs": [root] } }).to_string(),
    )
    .unwrap();

    cmd_in(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 scenarios (1 core, 0 extended)"));
}

#[test]
fn test_schema_outputs_json() {
    let temp = TempDir::new().unwrap();
    cmd_in(temp.path())
        .args(["config", "schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NeverGiveUpConfig"))
        .stdout(predicate::str::contains("static_format"));
}

#[test]
fn test_show_respects_explicit_config() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("custom.json");
    std::fs::write(&path, r#"{"sampling": {"max_tokens": 99}}"#).unwrap();

    cmd_in(temp.path())
        .args(["config", "show", "--json", "--config", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_tokens\":99"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp = TempDir::new().unwrap();
    cmd_in(temp.path())
        .args(["config", "show", "--config", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_validate_shows_warnings() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("never-give-up.json"),
        r#"{"logging": {"level": "loud"}}"#,
    )
    .unwrap();

    cmd_in(temp.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("logging.level.invalid"));
}

#[test]
fn test_invalid_json_config_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("never-give-up.json"), "{ nope").unwrap();

    cmd_in(temp.path())
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON"));
}
