use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "ANDROID_PROJECT_ROOT",
    "LANGSYNC_CONFIG",
    "TRANSLATION_PROVIDER",
    "TRANSLATION_API_KEY",
    "TRANSLATION_API_BASE_URL",
    "TRANSLATION_MODEL",
    "TRANSLATION_LANGUAGES",
    "SOURCE_LANGUAGE",
];

fn langsync_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("langsync"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn git(dir: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "user.name=langsync", "-c", "user.email=langsync@example.com"])
        .args(args)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn write_default_file(root: &Path, module: &str, content: &str) {
    let path = root.join(module).join("src/main/res/values/strings.xml");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

const STRINGS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="hello">Hello</string>
    <string name="bye">Goodbye</string>
    <string name="brand" translatable="false">Acme</string>
</resources>
"#;

#[test]
fn test_help_lists_commands() {
    let output = langsync_cmd().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("translate-all"));
    assert!(stdout.contains("translate-module"));
    assert!(stdout.contains("check-changes"));
}

#[test]
fn test_check_changes_reports_untracked_file() {
    let temp_dir = TempDir::new().unwrap();
    if !git(temp_dir.path(), &["init", "-q"]) {
        eprintln!("git not available, skipping");
        return;
    }
    write_default_file(temp_dir.path(), "app", STRINGS);

    let output = langsync_cmd()
        .args(["check-changes", "--project-root"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files_with_changes"], 1);
    let change = &report["changes"][0];
    assert_eq!(change["file"], "app/src/main/res/values/strings.xml");
    assert_eq!(change["added"], serde_json::json!(["hello", "bye"]));
    assert_eq!(change["order_changed"], false);
}

#[test]
fn test_check_changes_clean_after_commit() {
    let temp_dir = TempDir::new().unwrap();
    if !git(temp_dir.path(), &["init", "-q"]) {
        return;
    }
    write_default_file(temp_dir.path(), "app", STRINGS);
    assert!(git(temp_dir.path(), &["add", "-A"]));
    assert!(git(temp_dir.path(), &["commit", "-q", "-m", "strings"]));

    let output = langsync_cmd()
        .args(["check-changes"])
        .env("ANDROID_PROJECT_ROOT", temp_dir.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files_with_changes"], 0);
    assert_eq!(report["changes"], serde_json::json!([]));
}

#[test]
fn test_check_changes_with_relative_project_root() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("proj");
    fs::create_dir(&project).unwrap();
    if !git(&project, &["init", "-q"]) {
        return;
    }
    write_default_file(&project, "app", STRINGS);

    let output = langsync_cmd()
        .current_dir(temp_dir.path())
        .args(["check-changes", "--project-root", "proj"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files_with_changes"], 1);
    let change = &report["changes"][0];
    assert_eq!(change["file"], "app/src/main/res/values/strings.xml");
    assert_eq!(change["added"], serde_json::json!(["hello", "bye"]));
}

#[test]
fn test_check_changes_without_default_files_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = langsync_cmd()
        .args(["check-changes", "--project-root"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No default strings.xml"));
}

#[test]
fn test_translate_all_requires_api_key() {
    let temp_dir = TempDir::new().unwrap();
    write_default_file(temp_dir.path(), "app", STRINGS);

    let output = langsync_cmd()
        .args(["translate-all", "--project-root"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("API key"));
}

#[test]
fn test_unknown_provider_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write_default_file(temp_dir.path(), "app", STRINGS);

    let output = langsync_cmd()
        .args(["translate-all", "--provider", "babelfish", "--project-root"])
        .arg(temp_dir.path())
        .env("TRANSLATION_API_KEY", "sk-test")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported provider"));
}

#[test]
fn test_recognised_but_unimplemented_provider_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write_default_file(temp_dir.path(), "app", STRINGS);

    let output = langsync_cmd()
        .args(["translate-all", "--provider", "anthropic", "--api-key", "sk-test"])
        .args(["--project-root"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("anthropic"));
}

#[test]
fn test_translate_module_missing_module_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = langsync_cmd()
        .args(["translate-module", "--module-path", "feature/missing"])
        .args(["--api-key", "sk-test", "--project-root"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Directory does not exist"));
}

#[test]
fn test_invalid_config_file_reported() {
    let temp_dir = TempDir::new().unwrap();
    write_default_file(temp_dir.path(), "app", STRINGS);
    fs::write(temp_dir.path().join("langsync.toml"), "batch_size = \"many\"\n").unwrap();

    let output = langsync_cmd()
        .args(["check-changes", "--project-root"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid config"));
}
