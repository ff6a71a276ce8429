#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! pNode fleet aggregation.
//!
//! Polls the configured pNode RPC endpoints concurrently, deduplicates the
//! reported pods by public key, enriches them with credits and geolocation,
//! and serves the result through a short-lived TTL cache.
//!
//! Layout:
//! - [`contract`]: public models, errors and the [`contract::client::PodsApi`] trait
//! - [`domain`]: the TTL cache, merge rules, batch pacing and the aggregation service
//! - [`infra`]: JSON-RPC transport, resilient seed client, poller and enrichment sources
//! - [`api::rest`]: axum routes over the service
//! - [`module`]: wiring from [`config::AggregatorConfig`] to a running service

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod gateways;
pub mod infra;
pub mod module;

mod humantime_serde;


pub use config::AggregatorConfig;
pub use module::AggregatorModule;
