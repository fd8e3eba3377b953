//! Postal code lookup by racing independent providers.
//!
//! # Architecture
//!
//! - [`AddressService`] - Holds the provider registry and the race deadline
//! - [`race::race`] - Launches every fetcher, returns the first address or an error
//! - [`tracker::CompletionTracker`] - Counts fetcher exits so "all failed" is observable
//!
//! # Outcome
//!
//! A lookup yields exactly one of:
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | `Ok(AddressResult)` | The first provider to answer successfully |
//! | `LookupError::Timeout` | The deadline passed first; late answers are discarded |
//! | `LookupError::NoProviderSucceeded` | Every provider finished without an answer |
//! | `LookupError::NoProviders` | Nothing was registered |
//! | `LookupError::Cancelled` | The caller's parent token fired |
//!
//! Per-provider failures never surface; they are logged and the race moves on.

mod error;
pub mod race;
mod service;
pub mod tracker;

pub use cepfetch_providers;
pub use cepfetch_types::{AddressResult, LookupKey, Source};
pub use error::{Error, LookupError, ServiceError};
pub use service::AddressService;
pub use tokio_util::sync::CancellationToken;

use cepfetch_config::CepfetchConfig;
use std::time::Duration;

/// Resolve `cep` with the built-in providers and default settings.
///
/// `timeout` overrides the default 30 second budget for both the race and
/// each provider request.
pub async fn lookup(cep: &str, timeout: Option<Duration>) -> Result<AddressResult, Error> {
    let mut service = AddressService::new(&CepfetchConfig::default())?;
    if let Some(timeout) = timeout {
        service.set_timeout(timeout)?;
    }
    Ok(service.execute(cep).await?)
}
