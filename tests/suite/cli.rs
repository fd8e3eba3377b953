//! Runs the `cepfetch` binary against mock providers.

use crate::common::{
    CEP, brasilapi_body, config_toml, mount_brasilapi, mount_viacep, ok_json,
    start_brasilapi_mock, start_viacep_mock, viacep_body,
};
use std::io::Write;
use std::process::{Command, Output};
use std::time::Duration;
use wiremock::ResponseTemplate;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// The binary blocks, so run it off the runtime that serves the mocks.
async fn run_cepfetch(args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_cepfetch"))
            .args(&args)
            .env_remove("CEPFETCH_TIMEOUT_MS")
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn prints_winning_address_as_json() {
    let viacep = start_viacep_mock().await;
    let brasilapi = start_brasilapi_mock().await;
    mount_viacep(&viacep, ResponseTemplate::new(500)).await;
    mount_brasilapi(&brasilapi, ok_json(brasilapi_body(), Duration::ZERO)).await;
    let config = write_config(&config_toml(&viacep, &brasilapi, Duration::from_secs(5)));

    let output = run_cepfetch(vec![
        CEP.to_string(),
        "--json".to_string(),
        "--config".to_string(),
        config.path().display().to_string(),
    ])
    .await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["source"], "BrasilAPI");
    assert_eq!(value["city"], "São Paulo");
    assert_eq!(value["zip_code"], "01001000");
}

#[tokio::test]
async fn prints_aligned_block_by_default() {
    let viacep = start_viacep_mock().await;
    let brasilapi = start_brasilapi_mock().await;
    mount_viacep(&viacep, ok_json(viacep_body(), Duration::ZERO)).await;
    mount_brasilapi(&brasilapi, ResponseTemplate::new(404)).await;
    let config = write_config(&config_toml(&viacep, &brasilapi, Duration::from_secs(5)));

    let output = run_cepfetch(vec![
        "--config".to_string(),
        config.path().display().to_string(),
    ])
    .await;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("source        ViaCEP"), "stdout: {stdout}");
    assert!(stdout.contains("street        Praça da Sé"), "stdout: {stdout}");
}

#[tokio::test]
async fn exits_nonzero_when_no_provider_succeeds() {
    let viacep = start_viacep_mock().await;
    let brasilapi = start_brasilapi_mock().await;
    mount_viacep(&viacep, ResponseTemplate::new(500)).await;
    mount_brasilapi(&brasilapi, ResponseTemplate::new(500)).await;
    let config = write_config(&config_toml(&viacep, &brasilapi, Duration::from_secs(5)));

    let output = run_cepfetch(vec![
        CEP.to_string(),
        "--config".to_string(),
        config.path().display().to_string(),
    ])
    .await;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no provider succeeded"), "stderr: {stderr}");
}

#[tokio::test]
async fn timeout_flag_overrides_config() {
    let viacep = start_viacep_mock().await;
    let brasilapi = start_brasilapi_mock().await;
    mount_viacep(&viacep, ok_json(viacep_body(), Duration::from_secs(3))).await;
    mount_brasilapi(&brasilapi, ok_json(brasilapi_body(), Duration::from_secs(3))).await;
    let config = write_config(&config_toml(&viacep, &brasilapi, Duration::from_secs(30)));

    let output = run_cepfetch(vec![
        CEP.to_string(),
        "--timeout-ms".to_string(),
        "100".to_string(),
        "--config".to_string(),
        config.path().display().to_string(),
    ])
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("request timeout"), "stderr: {stderr}");
}

#[tokio::test]
async fn rejects_invalid_config() {
    let config = write_config("[lookup]\ntimeout_ms = 0\n");

    let output = run_cepfetch(vec![
        "--config".to_string(),
        config.path().display().to_string(),
    ])
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loading config"), "stderr: {stderr}");
}

#[tokio::test]
async fn missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let output = run_cepfetch(vec![
        "--config".to_string(),
        missing.display().to_string(),
    ])
    .await;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loading config from"), "stderr: {stderr}");
}
