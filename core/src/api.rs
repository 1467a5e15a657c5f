//! Executing facade: one method per Curated endpoint.
//!
//! Each method is a single `build_* -> Transport::execute -> parse_*` round
//! trip. Nothing is cached or retried, and a missing publication id is
//! reported before the transport is touched.

use std::fmt;

use serde_json::Value;

use crate::client::CuratedClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::HttpRequest;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Category, Link, Payload};

/// Blocking Curated API client.
///
/// ```no_run
/// use curated_core::{ClientConfig, CuratedApi};
///
/// let mut api = CuratedApi::new(ClientConfig::new("k1"));
/// let publications = api.list_publications()?;
/// api.set_publication_id("42");
/// let issues = api.list_issues()?;
/// # Ok::<(), curated_core::ApiError>(())
/// ```
pub struct CuratedApi<T = UreqTransport> {
    client: CuratedClient,
    transport: T,
}

impl CuratedApi<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }

    /// Build from `CURATED_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }
}

impl<T: Transport> CuratedApi<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: CuratedClient::new(&config),
            transport,
        }
    }

    pub fn client(&self) -> &CuratedClient {
        &self.client
    }

    pub fn publication_id(&self) -> Option<&str> {
        self.client.publication_id()
    }

    pub fn set_publication_id(&mut self, publication_id: impl Into<String>) {
        self.client.set_publication_id(publication_id);
    }

    pub fn with_publication_id(mut self, publication_id: impl Into<String>) -> Self {
        self.set_publication_id(publication_id);
        self
    }

    // -- publications ------------------------------------------------------

    pub fn list_publications(&self) -> Result<Value> {
        self.fetch(self.client.build_list_publications())
    }

    pub fn get_publication(&self) -> Result<Value> {
        self.fetch(self.client.build_get_publication()?)
    }

    // -- issues ------------------------------------------------------------

    pub fn list_issues(&self) -> Result<Value> {
        self.fetch(self.client.build_list_issues()?)
    }

    pub fn get_issue(&self, issue_id: impl fmt::Display) -> Result<Value> {
        self.fetch(self.client.build_get_issue(issue_id)?)
    }

    pub fn create_issue(&self, payload: &Payload) -> Result<Value> {
        self.fetch(self.client.build_create_issue(payload)?)
    }

    pub fn update_issue(&self, issue_id: impl fmt::Display, payload: &Payload) -> Result<Value> {
        self.fetch(self.client.build_update_issue(issue_id, payload)?)
    }

    pub fn delete_issue(&self, issue_id: impl fmt::Display) -> Result<()> {
        self.discard(self.client.build_delete_issue(issue_id)?)
    }

    // -- links -------------------------------------------------------------

    pub fn list_links(&self) -> Result<Value> {
        self.fetch(self.client.build_list_links()?)
    }

    pub fn list_issue_links(&self, issue_id: impl fmt::Display) -> Result<Value> {
        self.fetch(self.client.build_list_issue_links(issue_id)?)
    }

    pub fn get_link(&self, link_id: impl fmt::Display) -> Result<Value> {
        self.fetch(self.client.build_get_link(link_id)?)
    }

    pub fn create_link(&self, payload: &Payload) -> Result<Value> {
        self.fetch(self.client.build_create_link(payload)?)
    }

    pub fn update_link(&self, link_id: impl fmt::Display, payload: &Payload) -> Result<Value> {
        self.fetch(self.client.build_update_link(link_id, payload)?)
    }

    pub fn delete_link(&self, link_id: impl fmt::Display) -> Result<()> {
        self.discard(self.client.build_delete_link(link_id)?)
    }

    /// All publication links decoded as `Link`.
    pub fn links(&self) -> Result<Vec<Link>> {
        let request = self.client.build_list_links()?;
        self.client.parse_json(self.transport.execute(&request)?)
    }

    pub fn link(&self, link_id: impl fmt::Display) -> Result<Link> {
        let request = self.client.build_get_link(link_id)?;
        self.client.parse_json(self.transport.execute(&request)?)
    }

    /// PUT a `Link` back to the server under its own id.
    pub fn update_link_record(&self, link: Link) -> Result<Value> {
        let id = link
            .id_segment()
            .ok_or_else(|| ApiError::Config("link id has not been set".to_string()))?;
        let payload = link.into_payload()?;
        self.update_link(id, &payload)
    }

    // -- subscribers -------------------------------------------------------

    pub fn list_subscribers(&self) -> Result<Value> {
        self.fetch(self.client.build_list_subscribers()?)
    }

    pub fn get_subscriber(&self, subscriber_id: impl fmt::Display) -> Result<Value> {
        self.fetch(self.client.build_get_subscriber(subscriber_id)?)
    }

    pub fn create_subscriber(&self, payload: &Payload) -> Result<Value> {
        self.fetch(self.client.build_create_subscriber(payload)?)
    }

    pub fn update_subscriber(&self, subscriber_id: impl fmt::Display, payload: &Payload) -> Result<Value> {
        self.fetch(self.client.build_update_subscriber(subscriber_id, payload)?)
    }

    pub fn delete_subscriber(&self, subscriber_id: impl fmt::Display) -> Result<()> {
        self.discard(self.client.build_delete_subscriber(subscriber_id)?)
    }

    // -- categories --------------------------------------------------------

    pub fn list_categories(&self) -> Result<Value> {
        self.fetch(self.client.build_list_categories()?)
    }

    pub fn get_category(&self, category_id: impl fmt::Display) -> Result<Value> {
        self.fetch(self.client.build_get_category(category_id)?)
    }

    pub fn create_category(&self, payload: &Payload) -> Result<Value> {
        self.fetch(self.client.build_create_category(payload)?)
    }

    pub fn update_category(&self, category_id: impl fmt::Display, payload: &Payload) -> Result<Value> {
        self.fetch(self.client.build_update_category(category_id, payload)?)
    }

    pub fn delete_category(&self, category_id: impl fmt::Display) -> Result<()> {
        self.discard(self.client.build_delete_category(category_id)?)
    }

    /// All categories decoded as `Category`.
    pub fn categories(&self) -> Result<Vec<Category>> {
        let request = self.client.build_list_categories()?;
        self.client.parse_json(self.transport.execute(&request)?)
    }

    fn fetch(&self, request: HttpRequest) -> Result<Value> {
        let response = self.transport.execute(&request)?;
        self.client.parse_json(response)
    }

    fn discard(&self, request: HttpRequest) -> Result<()> {
        let response = self.transport.execute(&request)?;
        self.client.parse_empty(response)
    }
}
