use cepfetch_providers::InvalidEndpoint;
use std::time::Duration;

/// Why a lookup produced no address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The race deadline passed before any provider answered.
    #[error("request timeout after {0:?}")]
    Timeout(Duration),
    /// Every provider finished and none produced an address.
    #[error("no provider succeeded ({attempted} attempted)")]
    NoProviderSucceeded { attempted: usize },
    #[error("no providers registered")]
    NoProviders,
    /// The caller's parent token was cancelled.
    #[error("lookup cancelled")]
    Cancelled,
}

impl LookupError {
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Failure to assemble an [`crate::AddressService`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Endpoint(#[from] InvalidEndpoint),
    #[error("timeout must be greater than zero")]
    InvalidTimeout,
}

/// Anything [`crate::lookup`] can fail with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}
