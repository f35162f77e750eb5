//! Console configuration: service base URLs, the state directory holding the
//! persisted session, request timeout and the reconciliation policy. Defaults
//! target a local deployment and are overridden from CLI arguments or the
//! environment. Configuration values are public; do not store secrets here.

use crate::features::session::ValidationPolicy;
use std::{path::PathBuf, time::Duration};
use thiserror::Error;
use url::Url;

pub const DEFAULT_AUTH_URL: &str = "http://localhost:8081";
pub const DEFAULT_ADMIN_URL: &str = "http://localhost:8082";
/// Default request timeout (seconds) applied to every HTTP call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme {0}, expected http or https")]
    UnsupportedScheme(String),
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub auth_base_url: Url,
    pub admin_base_url: Url,
    pub state_dir: PathBuf,
    pub request_timeout: Duration,
    pub validation_policy: ValidationPolicy,
}

/// Raw, optional values collected from the CLI or environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub auth_base_url: Option<String>,
    pub admin_base_url: Option<String>,
    pub state_dir: Option<String>,
    pub timeout_secs: Option<u64>,
    pub validation_policy: Option<ValidationPolicy>,
}

impl AppConfig {
    /// Builds the configuration from defaults and the provided overrides.
    ///
    /// # Errors
    /// Returns an error if a base URL does not parse, uses a scheme other than
    /// http(s), or the timeout is zero.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let auth_base_url = overrides
            .auth_base_url
            .as_deref()
            .and_then(normalize_value)
            .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string());
        let admin_base_url = overrides
            .admin_base_url
            .as_deref()
            .and_then(normalize_value)
            .unwrap_or_else(|| DEFAULT_ADMIN_URL.to_string());
        let state_dir = overrides
            .state_dir
            .as_deref()
            .and_then(normalize_value)
            .map_or_else(default_state_dir, PathBuf::from);

        let timeout_secs = overrides.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            auth_base_url: parse_base_url(&auth_base_url)?,
            admin_base_url: parse_base_url(&admin_base_url)?,
            state_dir,
            request_timeout: Duration::from_secs(timeout_secs),
            validation_policy: overrides.validation_policy.unwrap_or_default(),
        })
    }
}

/// `<config dir>/authconsole`, or `./.authconsole` when the platform has none.
#[must_use]
pub fn default_state_dir() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from(".authconsole"),
        |dir| dir.join("authconsole"),
    )
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::UnsupportedScheme(scheme.to_string())),
    }
}

/// Trims a configured value and treats blanks as unset.
#[must_use]
pub fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
