//! Blocking client for the Curated publication-management API.
//!
//! # Overview
//! Maps each Curated endpoint (publications, issues, links, subscribers,
//! categories) to one method. Payloads and responses pass through as JSON;
//! the remote service decides what shapes are acceptable.
//!
//! # Design
//! - `CuratedClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network.
//! - `Transport` executes requests; `UreqTransport` is the default.
//! - `CuratedApi` combines the two into one call per endpoint.
//! - `ApiError` separates usage, transport, HTTP and decode failures.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::CuratedApi;
pub use client::CuratedClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Category, Link, Payload};
