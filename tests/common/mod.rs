//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests: mock ViaCEP and BrasilAPI
//! servers plus a config that points the service at them.

#![allow(dead_code)]

use cepfetch_config::CepfetchConfig;
use cepfetch_core::AddressService;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CEP: &str = "01001000";

/// Start a mock server that simulates ViaCEP
pub async fn start_viacep_mock() -> MockServer {
    MockServer::start().await
}

/// Start a mock server that simulates BrasilAPI
pub async fn start_brasilapi_mock() -> MockServer {
    MockServer::start().await
}

pub fn viacep_body() -> serde_json::Value {
    serde_json::json!({
        "cep": "01001-000",
        "logradouro": "Praça da Sé",
        "complemento": "lado ímpar",
        "bairro": "Sé",
        "localidade": "São Paulo",
        "uf": "SP",
        "ibge": "3550308",
        "ddd": "11"
    })
}

pub fn brasilapi_body() -> serde_json::Value {
    serde_json::json!({
        "cep": "01001000",
        "state": "SP",
        "city": "São Paulo",
        "neighborhood": "Sé",
        "street": "Praça da Sé",
        "service": "open-cep"
    })
}

fn viacep_path(cep: &str) -> String {
    format!("/ws/{cep}/json")
}

fn brasilapi_path(cep: &str) -> String {
    format!("/api/cep/v1/{cep}")
}

/// Mount a ViaCEP response for `CEP`, optionally delayed
pub async fn mount_viacep(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(viacep_path(CEP)))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mount a BrasilAPI response for `CEP`, optionally delayed
pub async fn mount_brasilapi(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(brasilapi_path(CEP)))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn ok_json(body: serde_json::Value, delay: Duration) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(body)
        .set_delay(delay)
}

/// Config TOML pointing both providers at the mock servers
pub fn config_toml(viacep: &MockServer, brasilapi: &MockServer, timeout: Duration) -> String {
    format!(
        "[lookup]\ntimeout_ms = {timeout_ms}\n\n\
         [providers]\n\
         viacep_url = \"{viacep}/ws/{{cep}}/json\"\n\
         brasilapi_url = \"{brasilapi}/api/cep/v1/{{cep}}\"\n",
        timeout_ms = timeout.as_millis(),
        viacep = viacep.uri(),
        brasilapi = brasilapi.uri(),
    )
}

pub fn config_for(viacep: &MockServer, brasilapi: &MockServer, timeout: Duration) -> CepfetchConfig {
    let config: CepfetchConfig = toml::from_str(&config_toml(viacep, brasilapi, timeout)).unwrap();
    config.validate().unwrap();
    config
}

/// Service against the mocks with its deadline pinned to `timeout`, so a
/// `CEPFETCH_TIMEOUT_MS` in the test environment cannot change it.
pub fn service_for(viacep: &MockServer, brasilapi: &MockServer, timeout: Duration) -> AddressService {
    AddressService::new(&config_for(viacep, brasilapi, timeout))
        .unwrap()
        .with_timeout(timeout)
        .unwrap()
}
