//! Ordered list of fetchers a lookup races.

use crate::brasilapi::BrasilApiPayload;
use crate::fetcher::{Endpoint, InvalidEndpoint, JsonFetcher};
use crate::viacep::ViaCepPayload;
use crate::{BRASILAPI_URL, Fetcher, VIACEP_URL};
use cepfetch_types::Source;
use std::fmt;
use std::sync::Arc;

/// Endpoint templates for the built-in providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub viacep: Endpoint,
    pub brasilapi: Endpoint,
}

impl Endpoints {
    pub fn new(viacep: &str, brasilapi: &str) -> Result<Self, InvalidEndpoint> {
        Ok(Self {
            viacep: Endpoint::new(viacep)?,
            brasilapi: Endpoint::new(brasilapi)?,
        })
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            viacep: Endpoint(VIACEP_URL.to_string()),
            brasilapi: Endpoint(BRASILAPI_URL.to_string()),
        }
    }
}

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    fetchers: Vec<Arc<dyn Fetcher>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ViaCEP then BrasilAPI, all sharing `client`.
    #[must_use]
    pub fn defaults(client: &reqwest::Client, endpoints: &Endpoints) -> Self {
        Self::new()
            .with_fetcher(Arc::new(JsonFetcher::<ViaCepPayload>::new(
                client.clone(),
                endpoints.viacep.clone(),
            )))
            .with_fetcher(Arc::new(JsonFetcher::<BrasilApiPayload>::new(
                client.clone(),
                endpoints.brasilapi.clone(),
            )))
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetchers.push(fetcher);
        self
    }

    #[must_use]
    pub fn fetchers(&self) -> &[Arc<dyn Fetcher>] {
        &self.fetchers
    }

    #[must_use]
    pub fn sources(&self) -> Vec<Source> {
        self.fetchers.iter().map(|fetcher| fetcher.source()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.sources()).finish()
    }
}
