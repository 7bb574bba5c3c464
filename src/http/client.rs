//! HTTP client with bounded retry
//!
//! The request executor behind every console call:
//! - Bearer authentication and a JSON content type on every request
//! - A JSON body is always sent, `null` when the caller has none
//! - Bounded retries on transient statuses, waiting through a `RetryDelay`
//! - Response bodies decoded into an `Envelope`

use super::backoff::{BackoffDelay, RetryDelay};
use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::Credential;
use crate::error::{is_retryable_status, Error, Result};
use crate::types::{BackoffType, JsonValue, Method, StringMap};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Retries after the first attempt, unless overridden per request
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Wait before each retry
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL prepended to relative paths
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: DEFAULT_RETRY_DELAY,
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Constant,
            rate_limit: None,
            user_agent: format!("fleetsync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Backoff strategy described by this config
    pub fn backoff(&self) -> BackoffDelay {
        BackoffDelay::new(self.backoff_type, self.initial_backoff, self.max_backoff)
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Use the same delay before every retry
    pub fn retry_delay(self, delay: Duration) -> Self {
        self.backoff(BackoffType::Constant, delay, delay)
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: StringMap,
    /// Request body (JSON); sent as `null` when absent
    pub body: Option<Value>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

/// Status code and decoded body of a successful response
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// HTTP status code
    pub status: u16,
    /// Decoded body; `None` when the server sent an empty payload
    pub data: Option<JsonValue>,
}

impl Envelope {
    /// Create an envelope
    pub fn new(status: u16, data: Option<JsonValue>) -> Self {
        Self { status, data }
    }
}

/// Authenticated HTTP client with bounded retry
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    credential: Credential,
    delay: Arc<dyn RetryDelay>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client; the credential is used on every request
    pub fn new(config: HttpClientConfig, credential: Credential) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);
        let delay: Arc<dyn RetryDelay> = Arc::new(config.backoff());

        Ok(Self {
            client,
            config,
            credential,
            delay,
            rate_limiter,
        })
    }

    /// Replace the retry delay strategy
    #[must_use]
    pub fn with_delay(mut self, delay: Arc<dyn RetryDelay>) -> Self {
        self.delay = delay;
        self
    }

    /// The credential this client authenticates with
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Send a request, retrying transient failures, and decode the body
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        request: &RequestConfig,
    ) -> Result<Envelope> {
        let full_url = self.build_url(url);
        let max_retries = request.max_retries.unwrap_or(self.config.max_retries);
        let body = serde_json::to_string(&request.body)?;
        let mut attempt: u32 = 0;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let response = self.send(method, &full_url, request, &body).await?;
            let status = response.status();

            if is_retryable_status(status.as_u16()) {
                attempt += 1;
                if attempt <= max_retries {
                    warn!(
                        "{} {} returned {}, retry {}/{}",
                        method,
                        full_url,
                        status.as_u16(),
                        attempt,
                        max_retries
                    );
                    self.delay.wait(attempt).await;
                    continue;
                }
                return Err(failure(method, &full_url, response).await);
            }

            if status.is_client_error() || status.is_server_error() {
                return Err(failure(method, &full_url, response).await);
            }

            debug!("{} {} succeeded with {}", method, full_url, status.as_u16());
            let text = response.text().await?;
            let data = decode_body(status.as_u16(), &text)?;
            return Ok(Envelope::new(status.as_u16(), data));
        }
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        request: &RequestConfig,
        body: &str,
    ) -> Result<Response> {
        let mut req = self
            .client
            .request(method.into(), url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_owned());

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        req = self.credential.apply(req);

        Ok(req.send().await?)
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("credential", &self.credential)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Turn a failing response into an `HttpStatus` error, logging its body once
async fn failure(method: Method, url: &str, response: Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    warn!("{} {} failed with {}: {}", method, url, status, body);
    Error::http_status(status, body)
}

/// Decode a success body: empty means no data, anything else must be JSON
pub(crate) fn decode_body(status: u16, text: &str) -> Result<Option<JsonValue>> {
    if text.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| Error::unexpected_response(status, e.to_string()))
}
