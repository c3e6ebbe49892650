//! Client settings
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then `SCHEMA_REGISTRY_*` environment variables.
//!
//! ```toml
//! base_url = "http://localhost:8081"
//! request_timeout_ms = 30000
//! connect_timeout_ms = 5000
//! ```

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::{SettingsError, TransportError, TransportErrorKind};

/// Prefix for environment variable overrides, e.g. `SCHEMA_REGISTRY_BASE_URL`.
pub const ENV_PREFIX: &str = "SCHEMA_REGISTRY";

/// Registry used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";

/// Connection settings for a registry client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Registry base URL
    pub base_url: String,
    /// Per-request timeout in milliseconds; `None` leaves reqwest's default (no timeout)
    pub request_timeout_ms: Option<u64>,
    /// TCP connect timeout in milliseconds; `None` leaves reqwest's default
    pub connect_timeout_ms: Option<u64>,
    /// `User-Agent` header sent with every request
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: None,
            connect_timeout_ms: None,
            user_agent: concat!("schema-registry-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientSettings {
    /// Settings for the registry at `base_url`, everything else defaulted.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(duration_ms(timeout));
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(duration_ms(timeout));
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    /// Load settings from an optional TOML file, overridden by
    /// `SCHEMA_REGISTRY_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        let settings: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        debug!(
            base_url = %settings.base_url,
            request_timeout_ms = ?settings.request_timeout_ms,
            "Loaded registry client settings"
        );

        Ok(settings)
    }

    /// Parse settings from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Build the `reqwest::Client` these settings describe.
    pub fn http_client(&self) -> Result<reqwest::Client, TransportError> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());

        if let Some(timeout) = self.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }

        builder.build().map_err(|e| {
            TransportError::new(TransportErrorKind::Request, "failed to build HTTP client")
                .with_source(e)
        })
    }
}

/// Whole milliseconds, rounding a non-zero sub-millisecond duration up so it
/// never collapses to a zero timeout.
fn duration_ms(timeout: Duration) -> u64 {
    let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    if ms == 0 && !timeout.is_zero() {
        1
    } else {
        ms
    }
}
