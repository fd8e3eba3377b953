//! Postal code lookup providers behind a common fetcher contract.
//!
//! # Architecture
//!
//! - [`Fetcher`] - The contract every provider satisfies: one lookup, normalized result
//! - [`fetcher::JsonFetcher`] - A single HTTP+JSON fetcher parameterized by payload type
//! - [`viacep`] / [`brasilapi`] - Provider payloads and their field mappings
//! - [`registry::ProviderRegistry`] - The ordered list of fetchers a lookup races
//!
//! # Cancellation
//!
//! A fetcher never decides timeouts or cancellation on its own. Callers cancel a
//! lookup by dropping the future returned from [`Fetcher::fetch`], which aborts the
//! in-flight HTTP request.
//!
//! # Error Handling
//!
//! [`FetchError`] describes why one provider produced nothing. It is meant to be
//! logged, not surfaced: the race only needs to know whether anyone succeeded.

pub mod brasilapi;
pub mod fetcher;
pub mod registry;
pub mod viacep;

pub use cepfetch_types;
pub use fetcher::{AddressPayload, Endpoint, InvalidEndpoint, JsonFetcher};
pub use registry::{Endpoints, ProviderRegistry};

use cepfetch_types::{AddressResult, LookupKey, Source};
use futures_util::future::BoxFuture;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;

/// Canonical ViaCEP endpoint template.
pub const VIACEP_URL: &str = "http://viacep.com.br/ws/{cep}/json";
/// Canonical BrasilAPI endpoint template.
pub const BRASILAPI_URL: &str = "https://brasilapi.com.br/api/cep/v1/{cep}";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const TCP_KEEPALIVE_SECS: u64 = 60;

const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Why a single provider lookup produced no address.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("postal code not found")]
    NotFound,
}

impl FetchError {
    /// Classify a transport error, separating timeouts from everything else.
    #[must_use]
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error)
        }
    }
}

/// One provider lookup.
///
/// Implementations issue a single outbound request and map a successful answer
/// into an [`AddressResult`] tagged with [`Fetcher::source`]. Dropping the
/// returned future must abort the request.
pub trait Fetcher: Send + Sync {
    fn source(&self) -> Source;

    fn fetch<'a>(&'a self, key: &'a LookupKey) -> BoxFuture<'a, Result<AddressResult, FetchError>>;
}

/// Settings shared by every provider's HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout enforced by the transport.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }
}

#[must_use]
pub fn default_user_agent() -> String {
    format!("cepfetch/{}", env!("CARGO_PKG_VERSION"))
}

fn base_client_builder(config: &ClientConfig) -> reqwest::ClientBuilder {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.as_str())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
}

/// Build the client every fetcher shares. It is never mutated after this call;
/// a different timeout means building a new client.
pub fn build_client(config: &ClientConfig) -> Result<reqwest::Client, reqwest::Error> {
    base_client_builder(config).timeout(config.timeout).build()
}

/// Decode a string field, treating JSON `null` as empty.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read an error response body for logging, capped at 32 KiB.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
