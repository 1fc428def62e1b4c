//! HTTP client building with middleware.

mod backoff;
mod client;

pub use backoff::BackoffPolicy;
pub use client::{ApiClient, ApiClientBuilder, HttpClientConfig};
