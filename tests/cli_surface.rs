//! Integration tests for the `healthwatch` CLI surface.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn healthwatch_cmd() -> Command {
    Command::cargo_bin("healthwatch").expect("healthwatch binary not found")
}

/// Minimal valid configuration for tests that get past argument parsing.
fn write_config(dir: &TempDir) {
    let config = r#"
database:
  path: ./db.sqlite
directories:
  images: ./images
api:
  auth_endpoint: http://127.0.0.1:9
  health_endpoint: http://127.0.0.1:9/health
  scope: scope
  timeout_secs: 1
retention_days: 30
report:
  from_days: 11
  to_days: 1
smtp:
  enabled: false
  server: 127.0.0.1
  port: 25
  mail_from: noreply@example.com
  subject: Service health report
customers:
  - name: acme
    credentials_var: HW_CLI_TEST_ACME
    services: [Intune]
    mail_to: ops@acme.example
"#;
    std::fs::write(dir.path().join("configuration.yaml"), config).unwrap();
}

#[test]
fn unknown_mode_exits_non_zero() {
    healthwatch_cmd()
        .args(["--mode", "garbage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not recognized"));
}

#[test]
fn help_lists_both_modes() {
    healthwatch_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan").and(predicate::str::contains("report")));
}

#[test]
fn missing_mode_with_empty_stdin_exits_non_zero() {
    healthwatch_cmd()
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not recognized"));
}

#[test]
fn unknown_customer_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    write_config(&dir);

    healthwatch_cmd()
        .current_dir(dir.path())
        .args(["--mode", "report", "--customer", "nosuch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not recognized in configuration"));
}

#[test]
fn report_for_known_customer_with_empty_datastore_succeeds_quietly() {
    let dir = TempDir::new().unwrap();
    write_config(&dir);

    // No data in the window: no email, exit zero, warning in the log.
    healthwatch_cmd()
        .current_dir(dir.path())
        .args(["--mode", "report", "--customer", "acme"])
        .assert()
        .success();
}
