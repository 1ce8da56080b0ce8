//! Client configuration
//!
//! [`ClientConfig`] can be built in code, loaded from a YAML or JSON file,
//! or read from `SPREEDLY_*` environment variables.
//!
//! ```yaml
//! token: 59f064f450af88df24f54281f3d78ad8ee0eb8f0
//! site_name: mysite-test
//! timeout_secs: 10
//! backoff: linear
//! initial_backoff_ms: 500
//! repeated_elements: accumulate
//! ```

use crate::decode::{DecoderConfig, RepeatedElements};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Production API host
pub const DEFAULT_HOST: &str = "https://spreedly.com";

/// API version segment of every endpoint
pub const DEFAULT_API_VERSION: &str = "v4";

/// Substring that marks a site as a test site
pub const TEST_SITE_MARKER: &str = "test";

/// Environment variable names read by [`ClientConfig::from_env`]
pub mod env_vars {
    pub const TOKEN: &str = "SPREEDLY_TOKEN";
    pub const SITE: &str = "SPREEDLY_SITE";
    pub const HOST: &str = "SPREEDLY_HOST";
    pub const API_VERSION: &str = "SPREEDLY_API_VERSION";
}

/// Configuration of a [`crate::api::Client`]
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API access token
    #[serde(default)]
    pub token: String,

    /// Site name registered with Spreedly
    #[serde(default, alias = "site")]
    pub site_name: String,

    /// Scheme and host of the API
    #[serde(default = "default_host")]
    pub host: String,

    /// API version path segment
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after connection failures or timeouts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay growth between transport retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Upper bound on any retry delay, in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// How repeated untyped XML children are decoded
    #[serde(default)]
    pub repeated_elements: RepeatedElements,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    200
}

fn default_max_backoff_ms() -> u64 {
    5_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            site_name: String::new(),
            host: default_host(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            user_agent: None,
            repeated_elements: RepeatedElements::default(),
        }
    }
}

impl ClientConfig {
    /// Create a config for a token and site with default settings
    pub fn new(token: impl Into<String>, site_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            site_name: site_name.into(),
            ..Default::default()
        }
    }

    /// Load a config file; `.json` files are read as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config(format!("Config file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Read the config from `SPREEDLY_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields with any `SPREEDLY_*` environment variables that are set
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(token) = lookup(env_vars::TOKEN) {
            self.token = token;
        }
        if let Some(site) = lookup(env_vars::SITE) {
            self.site_name = site;
        }
        if let Some(host) = lookup(env_vars::HOST) {
            self.host = host;
        }
        if let Some(version) = lookup(env_vars::API_VERSION) {
            self.api_version = version;
        }
    }

    /// Set the host (used to target a mock server)
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Retry delay strategy and its bounds
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffType, initial: Duration, max: Duration) -> Self {
        self.backoff = backoff;
        self.initial_backoff_ms = initial.as_millis() as u64;
        self.max_backoff_ms = max.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_repeated_elements(mut self, policy: RepeatedElements) -> Self {
        self.repeated_elements = policy;
        self
    }

    /// Check required fields and the host URL
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::missing_field("token"));
        }
        if self.site_name.trim().is_empty() {
            return Err(Error::missing_field("site_name"));
        }
        if self.site_name.contains(['/', '?', '#']) {
            return Err(Error::invalid_value(
                "site_name",
                "must be a single path segment",
            ));
        }
        if self.api_version.trim().is_empty() {
            return Err(Error::missing_field("api_version"));
        }

        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(Error::invalid_value(
                "initial_backoff_ms",
                format!("exceeds max_backoff_ms ({})", self.max_backoff_ms),
            ));
        }

        let host = Url::parse(&self.host)
            .map_err(|e| Error::invalid_value("host", e.to_string()))?;
        if !matches!(host.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "host",
                format!("unsupported scheme '{}'", host.scheme()),
            ));
        }
        Ok(())
    }

    /// `<host>/api/<version>/<site>/`
    pub fn base_url(&self) -> Result<Url> {
        let host = self.host.trim_end_matches('/');
        let url = format!("{host}/api/{}/{}/", self.api_version, self.site_name);
        Ok(Url::parse(&url)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Whether destructive test-only operations may run against this site
    pub fn is_test_site(&self) -> bool {
        self.site_name.contains(TEST_SITE_MARKER)
    }

    /// Decoder settings derived from this config
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig::default().repeated_elements(self.repeated_elements)
    }
}

// The token never reaches logs
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"***")
            .field("site_name", &self.site_name)
            .field("host", &self.host)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .field("initial_backoff_ms", &self.initial_backoff_ms)
            .field("max_backoff_ms", &self.max_backoff_ms)
            .field("user_agent", &self.user_agent)
            .field("repeated_elements", &self.repeated_elements)
            .finish()
    }
}
