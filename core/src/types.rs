//! Payload and DTO types for the Curated API.
//!
//! # Design
//! The wire contract is owned by the remote service, so the request boundary
//! is `Payload`, a plain JSON object forwarded as-is. `Link` and `Category`
//! are optional typed views layered on top; both keep unknown fields in a
//! flattened `extra` map so a value survives `from_value` / `into_payload`
//! without losing anything the server sent.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

/// Request body for create and update calls. Field names are sent verbatim.
pub type Payload = Map<String, Value>;

/// A link stored in a publication (or attached to an issue).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "image_url", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Usually a category code, but some publications return an object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(flatten)]
    pub extra: Payload,
}

impl Link {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn into_payload(self) -> Result<Payload> {
        to_payload(&self)
    }

    /// The link id rendered as a path segment. Integer and string ids are
    /// both accepted since the server is not consistent about the type.
    pub fn id_segment(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title.as_deref().unwrap_or(""))?;
        writeln!(f, "URL: {}", self.url)?;
        writeln!(f, "Description: {}", self.description.as_deref().unwrap_or(""))?;
        match &self.category {
            Some(Value::String(code)) => writeln!(f, "Category: {code}")?,
            Some(other) => writeln!(f, "Category: {other}")?,
            None => writeln!(f, "Category: ")?,
        }
        writeln!(f, "ID: {}", self.id_segment().unwrap_or_default())
    }
}

/// A category used to group links within a publication.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub sponsored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(flatten)]
    pub extra: Payload,
}

impl Category {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn into_payload(self) -> Result<Payload> {
        to_payload(&self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Code: {}", self.code.as_deref().unwrap_or(""))?;
        writeln!(f, "Name: {}", self.name.as_deref().unwrap_or(""))?;
        writeln!(f, "Sponsored: {}", self.sponsored)?;
        match self.limit {
            Some(limit) => writeln!(f, "Limit: {limit}"),
            None => writeln!(f, "Limit: "),
        }
    }
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn to_payload<T: Serialize>(value: &T) -> Result<Payload> {
    match serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
