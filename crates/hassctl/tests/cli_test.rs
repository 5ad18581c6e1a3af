//! Integration tests for the `hassctl` binary.
//!
//! Argument parsing, help output, completions and error exit codes run
//! without a server; request round trips run against a `wiremock` server.
#![allow(clippy::unwrap_used)]

use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `hassctl` binary with env isolation.
///
/// Clears every `HA_*` / `HASSCTL_*` variable and points config
/// directories at a nonexistent path so tests never touch the user's
/// real configuration.
fn hassctl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hassctl");
    cmd.env("HOME", "/tmp/hassctl-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/hassctl-test-nonexistent")
        .env_remove("HA_BEARER_TOKEN")
        .env_remove("HA_HOST_NAME")
        .env_remove("HA_PORT")
        .env_remove("HASSCTL_PROFILE")
        .env_remove("HASSCTL_OUTPUT")
        .env_remove("HASSCTL_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// A command already pointed at `server` with a token.
fn against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = hassctl_cmd();
    cmd.env("HA_HOST_NAME", "127.0.0.1")
        .env("HA_PORT", server.address().port().to_string())
        .env("HA_BEARER_TOKEN", "test-token")
        .arg("--color=never");
    cmd
}

/// Run a blocking command without stalling the runtime serving the mock.
async fn run(mut cmd: assert_cmd::Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = hassctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    hassctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Home Assistant")
            .and(predicate::str::contains("states"))
            .and(predicate::str::contains("services"))
            .and(predicate::str::contains("events")),
    );
}

#[test]
fn test_version_flag() {
    hassctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hassctl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    hassctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    hassctl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases (no server) ─────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = hassctl_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_states_list_without_config_is_usage_error() {
    hassctl_cmd()
        .args(["states", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("hassctl config init"));
}

#[test]
fn test_invalid_output_format() {
    let output = hassctl_cmd()
        .args(["--output", "invalid", "health"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("possible values"), "{text}");
}

#[test]
fn test_port_zero_is_rejected() {
    hassctl_cmd()
        .args(["--host", "localhost", "--port", "0", "health"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_port_env_is_usage_error() {
    hassctl_cmd()
        .env("HA_HOST_NAME", "localhost")
        .env("HA_BEARER_TOKEN", "t")
        .env("HA_PORT", "http")
        .arg("health")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("port"));
}

#[test]
fn test_config_show_no_config() {
    // `config show` falls back to defaults when no file exists.
    hassctl_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_path() {
    hassctl_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_file_profile_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("hassctl");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "default_profile = \"lab\"\n\n[profiles.lab]\nhost = \"10.1.2.3\"\nport = 9000\n",
    )
    .unwrap();

    hassctl_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "show", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab"));
}

// ── Round trips against a mock server ───────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_health_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "API running." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["-o", "json-compact", "health"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        r#"{"message":"API running."}"#
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_states_list_plain_filters_domain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "entity_id": "light.kitchen", "state": "on", "attributes": {} },
            { "entity_id": "sun.sun", "state": "above_horizon", "attributes": {} },
            { "entity_id": "light.porch", "state": "off", "attributes": {} }
        ])))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["-o", "plain", "states", "list", "--domain", "light"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "light.kitchen\nlight.porch\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_states_set_sends_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/states/sensor.test"))
        .and(body_json(json!({ "state": "42", "attributes": { "unit": "W" } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "entity_id": "sensor.test",
            "state": "42",
            "attributes": { "unit": "W" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args([
        "-o",
        "plain",
        "states",
        "set",
        "sensor.test",
        "42",
        "--attributes",
        r#"{"unit": "W"}"#,
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "42");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_entity_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/states/light.nope"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Entity not found."))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["states", "get", "light.nope"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Entity not found."), "{stderr}");
    assert!(stderr.contains("states list"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_exits_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("401: Unauthorized"))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.arg("health");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_service_data_is_usage_error() {
    let server = MockServer::start().await;

    let mut cmd = against(&server);
    cmd.args(["services", "call", "light", "turn_on", "--data", "[1, 2]"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dot_entity_id_is_refused_before_sending() {
    let server = MockServer::start().await;

    let mut cmd = against(&server);
    cmd.args(["states", "get", ".."]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_events_fire_prints_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/doorbell_pressed"))
        .and(body_json(json!({ "door": "front" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Event doorbell_pressed fired." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args([
        "-o",
        "plain",
        "events",
        "fire",
        "doorbell_pressed",
        "--data",
        r#"{"door": "front"}"#,
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Event doorbell_pressed fired."
    );
}

#[test]
fn test_unreachable_server_exits_connection() {
    // Bind and release a port so nothing is listening on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    hassctl_cmd()
        .args([
            "--host",
            "127.0.0.1",
            "--port",
            &port.to_string(),
            "--token",
            "t",
            "health",
        ])
        .assert()
        .code(7);
}
