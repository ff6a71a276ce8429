#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! HTTP client infrastructure for the pNode monitor
//!
//! This crate provides a small hyper-based HTTP client with:
//! - TLS via rustls with bundled webpki roots (HTTPS only by default)
//! - Connection pooling
//! - A per-request timeout covering both the response head and the body read
//! - User-Agent header injection
//! - Response body size limits
//!
//! Retries are deliberately absent: callers that need them (the resilient
//! RPC client) combine retry with endpoint failover themselves.
//!
//! # Example
//!
//! ```ignore
//! use pnode_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(5))
//!     .user_agent("pnode-monitor/0.1")
//!     .build()?;
//!
//! let data: MyData = client
//!     .get("https://example.com/api")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod request;
mod response;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::TransportSecurity;
pub use error::{HttpError, InvalidUriKind};
pub use request::RequestBuilder;
pub use response::HttpResponse;
