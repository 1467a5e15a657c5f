//! Executes `HttpRequest` values against the network.
//!
//! `Transport` is the seam between the pure request builder and real I/O.
//! `UreqTransport` is the blocking implementation used by `CuratedApi`;
//! tests substitute their own implementation to capture requests.

use std::time::Duration;

use ureq::{Agent, RequestBuilder};

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs exactly one HTTP round trip per call.
///
/// Implementations must return non-2xx responses as data; status
/// interpretation belongs to `CuratedClient::parse_*`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// `timeout` bounds the whole request, from connect to the last body byte.
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&request.url), request).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&request.url), request).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&request.url), request).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&request.url), request).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&request.url), request).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(&request.url), request).send_empty(),
        };

        let mut response = result.map_err(|e| {
            tracing::error!(error = %e, url = %request.url, "request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!(status, url = %request.url, "received response");
        Ok(HttpResponse { status, headers, body })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
