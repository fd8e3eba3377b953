//! Configuration for cepfetch.
//!
//! Read from `~/.cepfetch/config.toml`. Every section is optional; a missing
//! file means defaults. `${VAR}` references inside string values are expanded
//! from the environment, and `CEPFETCH_TIMEOUT_MS` overrides the lookup timeout.
//!
//! ```toml
//! [lookup]
//! timeout_ms = 30000
//!
//! [http]
//! user_agent = "cepfetch/0.1"
//! connect_timeout_ms = 10000
//!
//! [providers]
//! viacep_url = "http://viacep.com.br/ws/{cep}/json"
//! brasilapi_url = "https://brasilapi.com.br/api/cep/v1/{cep}"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
pub const TIMEOUT_ENV_VAR: &str = "CEPFETCH_TIMEOUT_MS";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CepfetchConfig {
    pub lookup: Option<LookupConfig>,
    pub http: Option<HttpConfig>,
    pub providers: Option<ProvidersConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LookupConfig {
    /// Race deadline and per-request transport timeout, in milliseconds.
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HttpConfig {
    pub user_agent: Option<String>,
    pub connect_timeout_ms: Option<u64>,
}

/// Endpoint template overrides. Each must contain `{cep}`.
#[derive(Debug, Default, Deserialize)]
pub struct ProvidersConfig {
    pub viacep_url: Option<String>,
    pub brasilapi_url: Option<String>,
}

/// Expand `${VAR}` references from the environment. Unset variables become empty.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + end_rel];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }

    out.push_str(rest);
    out
}

impl CepfetchConfig {
    /// Load from the default path. `Ok(None)` when there is no config file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path).map(Some),
            _ => Ok(None),
        }
    }

    /// Load from an explicit path. A missing file is a [`ConfigError::Read`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        let config: Self = match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(0) = self.lookup.as_ref().and_then(|lookup| lookup.timeout_ms) {
            return Err(ConfigError::Invalid(
                "lookup.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if let Some(0) = self.http.as_ref().and_then(|http| http.connect_timeout_ms) {
            return Err(ConfigError::Invalid(
                "http.connect_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Lookup timeout: `CEPFETCH_TIMEOUT_MS`, then `lookup.timeout_ms`, then 30s.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.resolve_timeout(env::var(TIMEOUT_ENV_VAR).ok().as_deref())
    }

    fn resolve_timeout(&self, env_override: Option<&str>) -> Duration {
        let from_env = env_override
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0);
        let millis = from_env
            .or_else(|| self.lookup.as_ref().and_then(|lookup| lookup.timeout_ms))
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Duration::from_millis(millis)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        let millis = self
            .http
            .as_ref()
            .and_then(|http| http.connect_timeout_ms)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS);
        Duration::from_millis(millis)
    }

    #[must_use]
    pub fn user_agent(&self) -> Option<String> {
        self.http
            .as_ref()
            .and_then(|http| http.user_agent.as_deref())
            .map(expand_env_vars)
    }

    #[must_use]
    pub fn viacep_url(&self) -> Option<String> {
        self.providers
            .as_ref()
            .and_then(|providers| providers.viacep_url.as_deref())
            .map(expand_env_vars)
    }

    #[must_use]
    pub fn brasilapi_url(&self) -> Option<String> {
        self.providers
            .as_ref()
            .and_then(|providers| providers.brasilapi_url.as_deref())
            .map(expand_env_vars)
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cepfetch").join("config.toml"))
}
