//! HTTP transport
//!
//! Sends requests to absolute URLs with a timeout and Basic credentials,
//! and retries connection failures and timeouts with backoff. Responses
//! come back as [`RawResponse`]: status codes are never interpreted or
//! retried here.

use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::{BackoffType, Method};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, warn};

/// Content type of request bodies sent to the API
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Transport settings shared by every request of an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    /// Retries after a connection failure or timeout
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_type: BackoffType,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            backoff_type: BackoffType::Exponential,
            user_agent: format!("spreedly-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Debug, Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Backoff strategy and its bounds
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Body of one request; an XML body is sent as `application/xml`
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub body: Option<String>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn xml(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Status code and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body of a 2xx response, or the status as an error
    pub fn into_success(self) -> Result<String> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(Error::http_status(self.status, self.body))
        }
    }
}

/// Async HTTP client with transport retries
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
}

impl HttpClient {
    /// Client without credentials
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Self::build(config, Authenticator::default())
    }

    /// Client that sends the given credentials with every request
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        Self::build(config, Authenticator::new(auth_config))
    }

    fn build(config: HttpClientConfig, authenticator: Authenticator) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            authenticator,
        })
    }

    /// Send a request to an absolute URL, retrying transport failures
    ///
    /// Any response that arrives is returned as-is, whatever its status.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<RawResponse> {
        let max_retries = self.config.max_retries;

        let mut attempt = 0;
        loop {
            let error = match self.prepare(method, url, &config).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response.text().await?;
                    debug!(%method, url, status, "Request completed");
                    return Ok(RawResponse { status, body });
                }
                Err(e) => e,
            };

            let transient = error.is_connect() || error.is_timeout();
            if !transient || attempt >= max_retries {
                return Err(if error.is_timeout() {
                    Error::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    }
                } else {
                    Error::Http(error)
                });
            }

            let delay = self.calculate_backoff(attempt);
            attempt += 1;
            warn!(
                %method,
                url,
                attempt,
                max_attempts = max_retries + 1,
                ?delay,
                "Transport error, retrying: {error}"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// One attempt's request with body and credentials
    fn prepare(&self, method: Method, url: &str, config: &RequestConfig) -> RequestBuilder {
        let mut req = self.client.request(method.into(), url);
        if let Some(body) = &config.body {
            req = req
                .header(CONTENT_TYPE, XML_CONTENT_TYPE)
                .body(body.clone());
        }
        self.authenticator.apply(req)
    }

    /// Delay before retry number `attempt + 1`, capped at `max_backoff`
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let initial = self.config.initial_backoff;
        let delay = match self.config.backoff_type {
            BackoffType::Constant => initial,
            BackoffType::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };

        delay.min(self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("auth", self.authenticator.config())
            .finish_non_exhaustive()
    }
}
