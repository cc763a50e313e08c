//! `FireKyt` publishing client.
//!
//! - [`http::HttpPublishingApi`]: reqwest transport for the publishing REST API
//! - [`cache::QueryCache`]: typed, injectable query cache
//! - [`network::NetworkStatus`]: online/offline signal
//! - [`service::PublishingService`]: connection workflow and publish orchestration

pub mod api;
pub mod cache;
pub mod error;
pub mod http;
pub mod network;
pub mod service;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod testing;

pub use api::PublishingApi;
pub use cache::{QueryCache, QueryKey};
pub use error::{ApiError, PublishError};
pub use http::{HttpConfig, HttpPublishingApi};
pub use network::NetworkStatus;
pub use service::{ConnectionCheck, ConnectionOutcome, PublishingService};
