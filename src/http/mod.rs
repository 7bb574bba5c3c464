//! HTTP client module
//!
//! The request executor every console call goes through.
//!
//! # Features
//!
//! - **Bearer Authentication**: the organization credential on every request
//! - **Bounded Retries**: transient statuses are retried up to `max_retries`
//! - **Pluggable Backoff**: constant (default, 5s), linear or exponential
//! - **Rate Limiting**: optional token bucket pacing using governor

mod backoff;
mod client;
mod rate_limit;

pub use backoff::{BackoffDelay, RetryDelay};
pub use client::{
    Envelope, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig,
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
