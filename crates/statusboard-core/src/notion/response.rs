//! Query payloads as returned to callers
//!
//! A [`QueryResponse`] is always well-shaped: failures carry an `error`
//! message and an empty `results` list instead of propagating.

use crate::error::NotionError;
use crate::normalize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of a database query, or the reason there is none
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    #[serde(default)]
    pub results: Vec<ExternalRecord>,

    #[serde(default)]
    pub has_more: bool,

    #[serde(default)]
    pub next_cursor: Option<String>,

    /// User-facing failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// HTTP status of a classified API failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// When the payload was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,

    /// Set when the source is unconfigured and pages should show sample data
    #[serde(default)]
    pub use_mock_data: bool,
}

impl QueryResponse {
    /// Failure after the request was attempted
    pub fn failed(error: &NotionError, timestamp: DateTime<Utc>) -> Self {
        Self {
            error: Some(error.to_string()),
            status_code: error.status_code(),
            timestamp: Some(timestamp),
            ..Self::default()
        }
    }

    /// Failure before any request, because configuration is incomplete
    pub fn config_error(error: &NotionError) -> Self {
        Self {
            error: Some(error.to_string()),
            use_mock_data: true,
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// One page (row) of a database, properties kept as raw JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalRecord {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub properties: Map<String, Value>,

    /// Fields this crate does not read (parent, icon, cover, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExternalRecord {
    /// Display value of a logical field
    pub fn value(&self, field: &str) -> Option<String> {
        normalize::property_value(&self.properties, field)
    }

    /// Flag value of a logical field
    pub fn flag(&self, field: &str) -> bool {
        normalize::property_flag(&self.properties, field)
    }

    pub fn title(&self) -> Option<String> {
        normalize::title_value(&self.properties)
    }

    /// Property names in payload order
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }
}
