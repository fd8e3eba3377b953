//! The lookup service: a provider registry plus a race deadline.

use crate::race::race;
use crate::{LookupError, ServiceError};
use cepfetch_config::CepfetchConfig;
use cepfetch_providers::{
    BRASILAPI_URL, ClientConfig, Endpoints, ProviderRegistry, VIACEP_URL,
    build_client, default_user_agent,
};
use cepfetch_types::{AddressResult, LookupKey};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How the built-in registry was assembled, so it can be rebuilt on timeout changes.
#[derive(Debug, Clone)]
struct BuiltinProviders {
    client: ClientConfig,
    endpoints: Endpoints,
}

/// Resolves postal codes by racing every registered provider.
///
/// ```no_run
/// use cepfetch_core::AddressService;
/// use cepfetch_config::CepfetchConfig;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = AddressService::new(&CepfetchConfig::default())?
///     .with_timeout(Duration::from_secs(1))?;
/// let address = service.execute("01001000").await?;
/// println!("{address}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AddressService {
    timeout: Duration,
    registry: ProviderRegistry,
    builtin: Option<BuiltinProviders>,
    parent: CancellationToken,
}

impl AddressService {
    /// ViaCEP and BrasilAPI, configured from `config`.
    pub fn new(config: &CepfetchConfig) -> Result<Self, ServiceError> {
        let timeout = config.timeout();
        if timeout.is_zero() {
            return Err(ServiceError::InvalidTimeout);
        }

        let client = ClientConfig {
            timeout,
            connect_timeout: config.connect_timeout(),
            user_agent: config.user_agent().unwrap_or_else(default_user_agent),
        };
        let endpoints = Endpoints::new(
            config.viacep_url().as_deref().unwrap_or(VIACEP_URL),
            config.brasilapi_url().as_deref().unwrap_or(BRASILAPI_URL),
        )?;

        let builtin = BuiltinProviders { client, endpoints };
        let registry = Self::build_registry(&builtin)?;
        Ok(Self {
            timeout,
            registry,
            builtin: Some(builtin),
            parent: CancellationToken::new(),
        })
    }

    /// Race an arbitrary set of fetchers.
    #[must_use]
    pub fn from_registry(registry: ProviderRegistry, timeout: Duration) -> Self {
        Self {
            timeout,
            registry,
            builtin: None,
            parent: CancellationToken::new(),
        }
    }

    fn build_registry(builtin: &BuiltinProviders) -> Result<ProviderRegistry, ServiceError> {
        let client = build_client(&builtin.client)?;
        Ok(ProviderRegistry::defaults(&client, &builtin.endpoints))
    }

    /// Cancelling `parent` aborts any lookup in progress with [`LookupError::Cancelled`].
    #[must_use]
    pub fn with_parent(mut self, parent: CancellationToken) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ServiceError> {
        self.set_timeout(timeout)?;
        Ok(self)
    }

    /// Change both the race deadline and, for the built-in providers, the
    /// per-request transport timeout.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<&mut Self, ServiceError> {
        if timeout.is_zero() {
            return Err(ServiceError::InvalidTimeout);
        }

        if let Some(builtin) = &self.builtin {
            let mut rebuilt = builtin.clone();
            rebuilt.client.timeout = timeout;
            self.registry = Self::build_registry(&rebuilt)?;
            self.builtin = Some(rebuilt);
        }
        self.timeout = timeout;
        Ok(self)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Resolve `cep` to the first address any provider returns before the deadline.
    pub async fn execute(&self, cep: impl Into<LookupKey>) -> Result<AddressResult, LookupError> {
        let key = cep.into();
        tracing::debug!(
            cep = %key,
            providers = self.registry.len(),
            timeout_ms = self.timeout.as_millis() as u64,
            "Starting lookup"
        );
        race(self.registry.fetchers(), key, self.timeout, &self.parent).await
    }
}
