//! Authenticated HTTP client for the Notion REST API
//!
//! Transport failures (connect, timeout, body decode) are retried with a
//! linearly growing delay. Non-2xx responses are classified once and returned
//! without another attempt.

use super::response::QueryResponse;
use super::schema::DatabaseSchema;
use crate::config::NotionConfig;
use crate::error::NotionError;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct NotionClient {
    http: Client,
    api_key: String,
    base_url: String,
    notion_version: String,
    page_size: u32,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url)
            .field("notion_version", &self.notion_version)
            .field("page_size", &self.page_size)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl NotionClient {
    /// Build a client; fails fast when no API key is configured
    pub fn new(config: &NotionConfig) -> Result<Self, NotionError> {
        let api_key = config.api_key.clone().ok_or(NotionError::MissingApiKey)?;
        let http = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            notion_version: config.notion_version.clone(),
            page_size: config.page_size,
            max_retries: config.max_retries.max(1),
            retry_base_delay: config.retry_base_delay,
        })
    }

    /// POST `/v1/databases/{id}/query`, first page only
    pub async fn query_database(&self, database_id: &str) -> Result<QueryResponse, NotionError> {
        let url = format!("{}/v1/databases/{}/query", self.base_url, database_id);
        let body = json!({ "page_size": self.page_size });
        let (url, body) = (&url, &body);

        let mut response: QueryResponse = self
            .with_retry("query", database_id, move || async move {
                let request = self.authorized(self.http.post(url)).json(body);
                let response = self.send(request, database_id).await?;
                Ok::<_, NotionError>(response.json::<QueryResponse>().await?)
            })
            .await?;

        if response.results.is_empty() {
            warn!(database = %short_id(database_id), "Notion query returned no results");
        } else {
            info!(
                database = %short_id(database_id),
                results = response.results.len(),
                has_more = response.has_more,
                "Notion query succeeded"
            );
        }

        response.database_id = Some(database_id.to_string());
        Ok(response)
    }

    /// GET `/v1/databases/{id}`: title and property definitions
    pub async fn retrieve_database(
        &self,
        database_id: &str,
    ) -> Result<DatabaseSchema, NotionError> {
        let url = format!("{}/v1/databases/{}", self.base_url, database_id);
        let url = &url;

        let raw: serde_json::Value = self
            .with_retry("retrieve", database_id, move || async move {
                let request = self.authorized(self.http.get(url));
                let response = self.send(request, database_id).await?;
                Ok::<_, NotionError>(response.json::<serde_json::Value>().await?)
            })
            .await?;

        Ok(DatabaseSchema::from_value(database_id, &raw))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("Notion-Version", &self.notion_version)
    }

    /// Send and turn non-2xx statuses into classified errors
    async fn send(&self, request: RequestBuilder, database_id: &str) -> Result<Response, NotionError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let status = status.as_u16();
        Err(NotionError::Api {
            status,
            message: classify_status(status, &body, database_id),
        })
    }

    async fn with_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        database_id: &str,
        mut call: F,
    ) -> Result<T, NotionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NotionError>>,
    {
        let mut attempt = 1;
        loop {
            debug!(operation, database = %short_id(database_id), attempt, "Calling Notion API");

            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.retry_base_delay * attempt;
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Notion API call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(operation, attempt, error = %e, "Notion API call failed");
                    return Err(e);
                }
            }
        }
    }
}

/// Readable message for a non-2xx status
pub fn classify_status(status: u16, body: &str, database_id: &str) -> String {
    match status {
        401 => "Notion API 키가 유효하지 않습니다. 올바른 API 키를 설정해주세요.".to_string(),
        404 => format!(
            "데이터베이스를 찾을 수 없습니다. 데이터베이스 ID({}...)가 올바른지 확인하고, 해당 데이터베이스에 접근 권한이 있는지 확인해주세요.",
            short_id(database_id)
        ),
        400 => format!("잘못된 요청입니다: {body}. 요청 형식을 확인해주세요."),
        429 => "Notion API 요청 한도를 초과했습니다. 잠시 후 다시 시도해주세요.".to_string(),
        _ => format!("Notion API 오류 ({status}): {body}"),
    }
}

/// First five characters of a database id, for logs and messages
pub fn short_id(database_id: &str) -> &str {
    database_id
        .char_indices()
        .nth(5)
        .map_or(database_id, |(idx, _)| &database_id[..idx])
}
