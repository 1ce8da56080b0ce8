//! HTTP client module
//!
//! Provides the transport used by the API client.
//!
//! # Features
//!
//! - **Raw responses**: status code and body are returned as-is, callers
//!   decide what a status means
//! - **Transport retries**: connection failures and timeouts are retried
//!   with backoff, HTTP statuses never are
//! - **Authentication**: Integration with auth module

mod client;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RawResponse, RequestConfig,
    XML_CONTENT_TYPE,
};

#[cfg(test)]
mod tests;
