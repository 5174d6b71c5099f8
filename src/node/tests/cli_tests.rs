//! Exit status and log level of the `ptloader` binary

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn ptloader(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ptloader"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("PTLOADER_MODULE")
        .env("RUST_LOG", "error")
        .output()
        .unwrap()
}

fn write_config(dir: &TempDir, module: &str) -> std::path::PathBuf {
    write_config_with_debug(dir, module, 0)
}

fn write_config_with_debug(dir: &TempDir, module: &str, debug: u8) -> std::path::PathBuf {
    let path = dir.path().join("ptloader.toml");
    let contents = format!(
        r#"
[ptloader]
module = "{module}"
config_dir = "{dir}"
debug = {debug}

[modules.static.members]
alice = ["staff"]
"#,
        module = module,
        dir = dir.path().display(),
        debug = debug
    );
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    let output = ptloader(&dir.path().join("unused.toml"), &["version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("ptloader v"));
}

#[test]
fn test_check_config_accepts_static_module() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "static");

    let output = ptloader(&config, &["check-config"]);

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("module:  static"));
}

#[test]
fn test_unknown_module_exits_config() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "nosuchmodule");

    let output = ptloader(&config, &["check-config"]);

    assert_eq!(output.status.code(), Some(78));
}

#[test]
fn test_module_override_from_command_line() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "static");

    let output = ptloader(&config, &["--module", "nosuchmodule", "check-config"]);

    assert_eq!(output.status.code(), Some(78));
}

#[test]
fn test_missing_config_file_exits_config() {
    let dir = TempDir::new().unwrap();

    let output = ptloader(&dir.path().join("missing.toml"), &["check-config"]);

    assert_eq!(output.status.code(), Some(78));
}

/// Run `check-config` with no `RUST_LOG`, so the config decides the level
fn check_config_log(config: &Path, args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_ptloader"))
        .arg("--config")
        .arg(config)
        .args(args)
        .arg("check-config")
        .env_remove("PTLOADER_MODULE")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
    log.push_str(&String::from_utf8_lossy(&output.stderr));
    log
}

#[test]
fn test_debug_level_from_config_file_enables_debug_logging() {
    let dir = TempDir::new().unwrap();
    let config = write_config_with_debug(&dir, "static", 2);

    let log = check_config_log(&config, &[]);

    assert!(log.contains("static membership table loaded"), "{}", log);
}

#[test]
fn test_debug_logging_off_by_default() {
    let dir = TempDir::new().unwrap();
    let config = write_config_with_debug(&dir, "static", 0);

    let log = check_config_log(&config, &[]);

    assert!(!log.contains("static membership table loaded"), "{}", log);
    assert!(log.contains("PTS module initialized"), "{}", log);
}

#[test]
fn test_debug_flag_enables_debug_logging() {
    let dir = TempDir::new().unwrap();
    let config = write_config_with_debug(&dir, "static", 0);

    let log = check_config_log(&config, &["-d", "1"]);

    assert!(log.contains("static membership table loaded"), "{}", log);
}
