//! HTTP+JSON fetcher shared by every built-in provider.
//!
//! Providers differ only in their URL and payload shape, so a single
//! [`JsonFetcher`] is parameterized by an [`AddressPayload`] type.

use crate::{FetchError, Fetcher, read_capped_error_body};
use cepfetch_types::{AddressResult, LookupKey, Source};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;

const CEP_PLACEHOLDER: &str = "{cep}";

// Characters that would break out of a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A provider-specific JSON body that knows how to normalize itself.
pub trait AddressPayload: DeserializeOwned + Send + 'static {
    const SOURCE: Source;

    fn into_address(self) -> Result<AddressResult, FetchError>;
}

#[derive(Debug, thiserror::Error)]
#[error("endpoint template must contain {{cep}}: {0}")]
pub struct InvalidEndpoint(pub String);

/// URL template with a single `{cep}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(pub(crate) String);

impl Endpoint {
    pub fn new(template: impl Into<String>) -> Result<Self, InvalidEndpoint> {
        let template = template.into();
        if template.contains(CEP_PLACEHOLDER) {
            Ok(Self(template))
        } else {
            Err(InvalidEndpoint(template))
        }
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.0
    }

    /// Substitute the key, percent-encoded so it stays inside one path segment.
    #[must_use]
    pub fn url_for(&self, key: &LookupKey) -> String {
        let encoded = utf8_percent_encode(key.as_str(), PATH_SEGMENT).to_string();
        self.0.replace(CEP_PLACEHOLDER, &encoded)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// GET `endpoint`, decode the body as `P`, and normalize it.
pub struct JsonFetcher<P> {
    client: reqwest::Client,
    endpoint: Endpoint,
    _payload: PhantomData<fn() -> P>,
}

impl<P> JsonFetcher<P> {
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: Endpoint) -> Self {
        Self {
            client,
            endpoint,
            _payload: PhantomData,
        }
    }
}

impl<P: AddressPayload> JsonFetcher<P> {
    async fn lookup(&self, key: &LookupKey) -> Result<AddressResult, FetchError> {
        let url = self.endpoint.url_for(key);
        tracing::debug!(provider = %P::SOURCE, %url, "Sending lookup request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            return Err(FetchError::Status { status, body });
        }

        let bytes = response.bytes().await.map_err(FetchError::from_transport)?;
        let payload: P = serde_json::from_slice(&bytes)?;
        payload.into_address()
    }
}

impl<P: AddressPayload> Fetcher for JsonFetcher<P> {
    fn source(&self) -> Source {
        P::SOURCE
    }

    fn fetch<'a>(&'a self, key: &'a LookupKey) -> BoxFuture<'a, Result<AddressResult, FetchError>> {
        self.lookup(key).boxed()
    }
}

impl<P: AddressPayload> fmt::Debug for JsonFetcher<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFetcher")
            .field("source", &P::SOURCE)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
