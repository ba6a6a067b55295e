//! HTTP client module
//!
//! Provides the HTTP client the page fetcher sends its requests through.
//!
//! # Features
//!
//! - **Status Classification**: 401/403, 429 and other failures map onto
//!   distinct error variants
//! - **Rate Limiting**: Optional client-side token bucket using governor
//! - **Authentication**: Integration with the auth module
//!
//! Requests are never retried; the first failure is returned.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
