//! CLI smoke tests for the course-server binary: help and version output,
//! configuration validation and a short-lived server run.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn run_course_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_course-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute course-server")
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let home = dir.join("home").to_string_lossy().replace('\\', "/");
    let path = dir.join("config.yaml");
    let content = format!(
        "server:\n  home_dir: \"{home}\"\n  host: \"127.0.0.1\"\n  port: 8087\n{body}"
    );
    std::fs::write(&path, content).expect("Failed to write config file");
    path
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("no free port")
}

/// GET `path` with a fresh connection, retrying until the server accepts.
fn http_get(port: u16, path: &str, wait: Duration) -> Option<String> {
    let started = Instant::now();
    while started.elapsed() < wait {
        if let Ok(mut stream) = TcpStream::connect(("127.0.0.1", port)) {
            let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
            stream.write_all(req.as_bytes()).ok()?;
            let mut raw = String::new();
            stream.read_to_string(&mut raw).ok()?;
            return Some(raw);
        }
        sleep(Duration::from_millis(100));
    }
    None
}

struct KillOnDrop(Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

#[test]
fn test_cli_help_command() {
    let output = run_course_server(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_course_server(&["--version"]);
    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("course-server"), "Should contain binary name");
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_course_server(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the bad subcommand: {stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_course_server(&["--config", "/nonexistent/config.yaml", "check"]);
    assert!(!output.status.success(), "Should fail with missing config");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file not found"), "{stderr}");
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed").unwrap();

    let output = run_course_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("yaml"), "Should mention YAML parsing issue: {stderr}");
}

#[test]
fn test_cli_config_validation_invalid_module_section() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        "modules:\n  courses:\n    max_name_length: \"long\"\n",
    );

    let output = run_course_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid courses config"), "{stderr}");
}

#[test]
fn test_cli_config_validation_valid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        r#"
database:
  url: "sqlite://database/courses.db?mode=rwc"
  max_conns: 4

logging:
  default:
    console_level: info
    file: "logs/course-server.log"
    file_level: info
    max_backups: 3
    max_size_mb: 10

modules:
  courses:
    max_name_length: 80
    enforce_unique_constraints: true
  api_ingress:
    bind_addr: "127.0.0.1:18087"
    cors_enabled: true
"#,
    );

    let output = run_course_server(&["--config", config_path.to_str().unwrap(), "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "STDOUT: {stdout}\nSTDERR: {stderr}");
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("max_name_length: 80"));
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), "");

    let output = run_course_server(&[
        "--config",
        config_path.to_str().unwrap(),
        "--port",
        "9123",
        "--print-config",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9123"), "{stdout}");
}

#[test]
fn test_cli_run_command_with_mock_database() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        "database:\n  url: \"sqlite://database/ignored.db?mode=rwc\"\n",
    );
    let port = free_port();

    let child = Command::new(env!("CARGO_BIN_EXE_course-server"))
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "--port",
            &port.to_string(),
            "--mock",
            "run",
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to start course-server");
    let mut child = KillOnDrop(child);

    let health = http_get(port, "/health", Duration::from_secs(15))
        .expect("server should accept connections");
    assert!(health.starts_with("HTTP/1.1 200"), "{health}");

    let courses = http_get(port, "/courses", Duration::from_secs(5)).unwrap();
    assert!(courses.starts_with("HTTP/1.1 200"), "{courses}");
    assert!(courses.ends_with("[]"), "{courses}");

    let openapi = http_get(port, "/openapi.json", Duration::from_secs(5)).unwrap();
    assert!(openapi.contains("/courses/{id}/attendance/stats"));

    assert!(
        child.0.try_wait().unwrap().is_none(),
        "server should still be running"
    );
    // --mock never touches the configured file
    assert!(!temp_dir.path().join("home/database/ignored.db").exists());
}

#[test]
fn test_sample_config_passes_check() {
    let temp_dir = TempDir::new().unwrap();
    let sample = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/course-server.yaml");

    let output = Command::new(env!("CARGO_BIN_EXE_course-server"))
        .args(["--config", sample.to_str().unwrap(), "check"])
        .env("APP__SERVER__HOME_DIR", temp_dir.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{stderr}");
    assert!(temp_dir.path().join("logs").is_dir());
}
