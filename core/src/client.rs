//! HTTP request builder and response parser for the Curated API.
//!
//! # Design
//! `CuratedClient` holds the base URL, the API key and the selected
//! publication id, and performs no I/O. Each endpoint has a `build_*` method
//! that produces an `HttpRequest`; responses go through `parse_json` or
//! `parse_empty`. `CuratedApi` glues the two halves to a `Transport`, but the
//! split stays public so callers can run requests on their own HTTP stack.
//!
//! Publication-scoped builders refuse to run until a publication id is set,
//! so a request with a hole in its path is never produced.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Payload;

/// Resource collections nested under `publications/{publication_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Issues,
    Links,
    Subscribers,
    Categories,
}

impl Collection {
    fn segment(self) -> &'static str {
        match self {
            Collection::Issues => "issues",
            Collection::Links => "links",
            Collection::Subscribers => "subscribers",
            Collection::Categories => "categories",
        }
    }
}

/// Request builder and response parser for the Curated API.
#[derive(Debug, Clone)]
pub struct CuratedClient {
    base_url: String,
    api_key: String,
    publication_id: Option<String>,
}

impl CuratedClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            publication_id: config.publication_id.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn publication_id(&self) -> Option<&str> {
        self.publication_id.as_deref()
    }

    /// Select the publication used by every scoped endpoint.
    pub fn set_publication_id(&mut self, publication_id: impl Into<String>) {
        self.publication_id = Some(publication_id.into());
    }

    pub fn with_publication_id(mut self, publication_id: impl Into<String>) -> Self {
        self.set_publication_id(publication_id);
        self
    }

    // -- publications ------------------------------------------------------

    /// `GET /publications`. Needs no publication id; this is how ids are
    /// discovered.
    pub fn build_list_publications(&self) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/publications", self.base_url), None)
    }

    /// `GET /publications/{publication_id}` for the selected publication.
    pub fn build_get_publication(&self) -> Result<HttpRequest> {
        let url = self.publication_url()?;
        Ok(self.request(HttpMethod::Get, url, None))
    }

    // -- issues ------------------------------------------------------------

    pub fn build_list_issues(&self) -> Result<HttpRequest> {
        self.build_list(Collection::Issues)
    }

    pub fn build_get_issue(&self, issue_id: impl fmt::Display) -> Result<HttpRequest> {
        self.build_get(Collection::Issues, issue_id)
    }

    pub fn build_create_issue(&self, payload: &Payload) -> Result<HttpRequest> {
        self.build_create(Collection::Issues, payload)
    }

    pub fn build_update_issue(&self, issue_id: impl fmt::Display, payload: &Payload) -> Result<HttpRequest> {
        self.build_update(Collection::Issues, issue_id, payload)
    }

    pub fn build_delete_issue(&self, issue_id: impl fmt::Display) -> Result<HttpRequest> {
        self.build_delete(Collection::Issues, issue_id)
    }

    // -- links -------------------------------------------------------------

    pub fn build_list_links(&self) -> Result<HttpRequest> {
        self.build_list(Collection::Links)
    }

    /// `GET /publications/{publication_id}/issues/{issue_id}/links`
    pub fn build_list_issue_links(&self, issue_id: impl fmt::Display) -> Result<HttpRequest> {
        let url = format!(
            "{}/{}/{}",
            self.collection_url(Collection::Issues)?,
            encode_segment(issue_id),
            Collection::Links.segment()
        );
        Ok(self.request(HttpMethod::Get, url, None))
    }

    pub fn build_get_link(&self, link_id: impl fmt::Display) -> Result<HttpRequest> {
        self.build_get(Collection::Links, link_id)
    }

    pub fn build_create_link(&self, payload: &Payload) -> Result<HttpRequest> {
        self.build_create(Collection::Links, payload)
    }

    pub fn build_update_link(&self, link_id: impl fmt::Display, payload: &Payload) -> Result<HttpRequest> {
        self.build_update(Collection::Links, link_id, payload)
    }

    pub fn build_delete_link(&self, link_id: impl fmt::Display) -> Result<HttpRequest> {
        self.build_delete(Collection::Links, link_id)
    }

    // -- subscribers -------------------------------------------------------

    pub fn build_list_subscribers(&self) -> Result<HttpRequest> {
        self.build_list(Collection::Subscribers)
    }

    pub fn build_get_subscriber(&self, subscriber_id: impl fmt::Display) -> Result<HttpRequest> {
        self.build_get(Collection::Subscribers, subscriber_id)
    }

    pub fn build_create_subscriber(&self, payload: &Payload) -> Result<HttpRequest> {
        self.build_create(Collection::Subscribers, payload)
    }

    pub fn build_update_subscriber(
        &self,
        subscriber_id: impl fmt::Display,
        payload: &Payload,
    ) -> Result<HttpRequest> {
        self.build_update(Collection::Subscribers, subscriber_id, payload)
    }

    pub fn build_delete_subscriber(&self, subscriber_id: impl fmt::Display) -> Result<HttpRequest> {
        self.build_delete(Collection::Subscribers, subscriber_id)
    }

    // -- categories --------------------------------------------------------

    pub fn build_list_categories(&self) -> Result<HttpRequest> {
        self.build_list(Collection::Categories)
    }

    pub fn build_get_category(&self, category_id: impl fmt::Display) -> Result<HttpRequest> {
        self.build_get(Collection::Categories, category_id)
    }

    pub fn build_create_category(&self, payload: &Payload) -> Result<HttpRequest> {
        self.build_create(Collection::Categories, payload)
    }

    pub fn build_update_category(
        &self,
        category_id: impl fmt::Display,
        payload: &Payload,
    ) -> Result<HttpRequest> {
        self.build_update(Collection::Categories, category_id, payload)
    }

    pub fn build_delete_category(&self, category_id: impl fmt::Display) -> Result<HttpRequest> {
        self.build_delete(Collection::Categories, category_id)
    }

    // -- parsing -----------------------------------------------------------

    /// Decode a 2xx JSON body. Any other status becomes `ApiError::Http`.
    pub fn parse_json<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Accept any 2xx response and discard its body (deletes answer 204).
    pub fn parse_empty(&self, response: HttpResponse) -> Result<()> {
        check_status(&response)
    }

    // -- helpers -----------------------------------------------------------

    fn build_list(&self, collection: Collection) -> Result<HttpRequest> {
        let url = self.collection_url(collection)?;
        Ok(self.request(HttpMethod::Get, url, None))
    }

    fn build_get(&self, collection: Collection, id: impl fmt::Display) -> Result<HttpRequest> {
        let url = format!("{}/{}", self.collection_url(collection)?, encode_segment(id));
        Ok(self.request(HttpMethod::Get, url, None))
    }

    fn build_create(&self, collection: Collection, payload: &Payload) -> Result<HttpRequest> {
        let url = self.collection_url(collection)?;
        let body = serialize(payload)?;
        Ok(self.request(HttpMethod::Post, url, Some(body)))
    }

    fn build_update(&self, collection: Collection, id: impl fmt::Display, payload: &Payload) -> Result<HttpRequest> {
        let url = format!("{}/{}", self.collection_url(collection)?, encode_segment(id));
        let body = serialize(payload)?;
        Ok(self.request(HttpMethod::Put, url, Some(body)))
    }

    fn build_delete(&self, collection: Collection, id: impl fmt::Display) -> Result<HttpRequest> {
        let url = format!("{}/{}", self.collection_url(collection)?, encode_segment(id));
        Ok(self.request(HttpMethod::Delete, url, None))
    }

    fn publication_url(&self) -> Result<String> {
        match self.publication_id.as_deref() {
            Some(id) if !id.trim().is_empty() => {
                Ok(format!("{}/publications/{}", self.base_url, encode_segment(id)))
            }
            _ => Err(ApiError::MissingPublicationId),
        }
    }

    fn collection_url(&self, collection: Collection) -> Result<String> {
        Ok(format!("{}/{}", self.publication_url()?, collection.segment()))
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), format!("Token token=\"{}\"", self.api_key)),
            ],
            body,
        }
    }
}

/// Percent-encode an id so it stays a single path segment.
fn encode_segment(id: impl fmt::Display) -> String {
    urlencoding::encode(&id.to_string()).into_owned()
}

fn serialize(payload: &Payload) -> Result<String> {
    serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Map non-2xx status codes to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    tracing::warn!(status = response.status, "curated API returned an error status");
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
