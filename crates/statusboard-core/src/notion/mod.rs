//! Notion content API: client, payloads, cached source

mod client;
mod response;
mod schema;
mod source;

pub use client::{classify_status, short_id, NotionClient};
pub use response::{ExternalRecord, QueryResponse};
pub use schema::{DatabaseSchema, PropertySchema, SchemaReport};
pub use source::{cache_key, NotionSource, CACHE_KEY_PREFIX};
