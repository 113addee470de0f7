//! Cached access to the configured Notion databases
//!
//! `fetch` never fails: configuration gaps, API errors and exhausted retries
//! all come back as a [`QueryResponse`] with `error` set. Only successful
//! payloads reach the response cache.

use super::client::{short_id, NotionClient};
use super::response::QueryResponse;
use super::schema::DatabaseSchema;
use crate::cache::{CacheOptions, Clock, ResponseCache, SystemClock};
use crate::config::NotionConfig;
use crate::error::NotionError;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Prefix of response cache keys; the database id is appended
pub const CACHE_KEY_PREFIX: &str = "notion-data";

const SCHEMA_CACHE_TTL: Duration = Duration::from_secs(300);
const SCHEMA_CACHE_CAPACITY: u64 = 64;

pub fn cache_key(database_id: &str) -> String {
    format!("{CACHE_KEY_PREFIX}-{database_id}")
}

pub struct NotionSource {
    config: NotionConfig,
    /// `None` when no API key is configured
    client: Option<NotionClient>,
    responses: Arc<ResponseCache<QueryResponse>>,
    schemas: Cache<String, Arc<DatabaseSchema>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for NotionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionSource")
            .field("config", &self.config)
            .field("configured", &self.client.is_some())
            .field("responses", &self.responses)
            .finish_non_exhaustive()
    }
}

impl NotionSource {
    pub fn new(config: NotionConfig) -> Result<Self, NotionError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Source whose cache and timestamps follow `clock`
    pub fn with_clock(config: NotionConfig, clock: Arc<dyn Clock>) -> Result<Self, NotionError> {
        let client = match NotionClient::new(&config) {
            Ok(client) => Some(client),
            Err(NotionError::MissingApiKey) => {
                warn!("NOTION_API_KEY is not set, Notion pages will show sample data");
                None
            }
            Err(e) => return Err(e),
        };

        let schemas = Cache::builder()
            .max_capacity(SCHEMA_CACHE_CAPACITY)
            .time_to_live(SCHEMA_CACHE_TTL)
            .build();

        Ok(Self {
            config,
            client,
            responses: Arc::new(ResponseCache::with_clock(clock.clone())),
            schemas,
            clock,
        })
    }

    pub fn config(&self) -> &NotionConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn responses(&self) -> &ResponseCache<QueryResponse> {
        &self.responses
    }

    /// Query `database_id` through the response cache
    pub async fn fetch(&self, database_id: Option<&str>, force_refresh: bool) -> QueryResponse {
        let Some(client) = self.client.as_ref() else {
            return QueryResponse::config_error(&NotionError::MissingApiKey);
        };
        let Some(database_id) = database_id.map(str::trim).filter(|id| !id.is_empty()) else {
            warn!("Notion fetch without a database id");
            return QueryResponse::config_error(&NotionError::MissingDatabaseId);
        };

        debug!(database = %short_id(database_id), force_refresh, "Preparing Notion fetch");

        let options = CacheOptions::new(self.config.cache_expiry).with_force_refresh(force_refresh);
        let clock = &self.clock;
        let result = self
            .responses
            .fetch_with_cache(
                &cache_key(database_id),
                move || async move {
                    let mut response = client.query_database(database_id).await?;
                    response.timestamp = Some(clock.now());
                    Ok::<_, NotionError>(response)
                },
                options,
            )
            .await;

        match result {
            Ok(response) => response,
            Err(e) => {
                warn!(database = %short_id(database_id), error = %e, "Notion fetch failed");
                QueryResponse::failed(&e, self.clock.now())
            }
        }
    }

    pub async fn fetch_projects(&self, force_refresh: bool) -> QueryResponse {
        self.fetch(self.config.projects_database_id.as_deref(), force_refresh)
            .await
    }

    pub async fn fetch_services(&self, force_refresh: bool) -> QueryResponse {
        self.fetch(self.config.services_database_id.as_deref(), force_refresh)
            .await
    }

    /// Property definitions of `database_id`, memoized for a few minutes
    pub async fn schema(&self, database_id: &str) -> Result<Arc<DatabaseSchema>, NotionError> {
        let client = self.client.as_ref().ok_or(NotionError::MissingApiKey)?;
        if database_id.trim().is_empty() {
            return Err(NotionError::MissingDatabaseId);
        }

        if let Some(schema) = self.schemas.get(database_id).await {
            debug!(database = %short_id(database_id), "Schema cache hit");
            return Ok(schema);
        }

        let schema = Arc::new(client.retrieve_database(database_id).await?);
        info!(
            database = %short_id(database_id),
            properties = schema.properties.len(),
            "Loaded database schema"
        );
        self.schemas
            .insert(database_id.to_string(), schema.clone())
            .await;
        Ok(schema)
    }

    /// Drop cached query responses and schemas
    pub fn invalidate_all(&self) {
        self.responses.clear();
        self.schemas.invalidate_all();
    }
}
