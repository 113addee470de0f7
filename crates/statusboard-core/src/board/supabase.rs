//! PostgREST-backed store for the `help_requests` table

use super::store::PostStore;
use crate::config::SupabaseConfig;
use crate::error::BoardError;
use async_trait::async_trait;
use reqwest::header::CONTENT_RANGE;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use statusboard_types::{HelpRequest, HelpRequestOrder, NewHelpRequest};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct SupabaseStore {
    http: Client,
    endpoint: String,
    service_role_key: String,
}

impl fmt::Debug for SupabaseStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseStore")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl SupabaseStore {
    pub fn new(config: &SupabaseConfig) -> Result<Self, BoardError> {
        let (Some(url), Some(key)) = (config.url.as_ref(), config.service_role_key.as_ref()) else {
            return Err(BoardError::NotConfigured {
                missing: config.missing().join(", "),
            });
        };

        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/rest/v1/{}", url.trim_end_matches('/'), config.table),
            service_role_key: key.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BoardError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), %message, "Supabase request failed");
        Err(BoardError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<T>, BoardError> {
        let response = self.send(request).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| BoardError::InvalidResponse {
                message: e.to_string(),
            })
    }
}

fn order_clause(order: HelpRequestOrder) -> &'static str {
    match order {
        HelpRequestOrder::Latest => "created_at.desc",
        HelpRequestOrder::Oldest => "created_at.asc",
        HelpRequestOrder::Popular => "likes.desc,created_at.desc",
    }
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/0`
pub fn parse_content_range_total(header: &str) -> Option<usize> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

fn id_text(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[async_trait]
impl PostStore for SupabaseStore {
    async fn list(&self, order: HelpRequestOrder) -> Result<Vec<HelpRequest>, BoardError> {
        let request = self
            .http
            .get(&self.endpoint)
            .query(&[("select", "*"), ("order", order_clause(order))]);
        let rows = self.rows(request).await?;
        debug!(%order, rows = rows.len(), "Listed help requests");
        Ok(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<HelpRequest>, BoardError> {
        let request = self
            .http
            .get(&self.endpoint)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))]);
        Ok(self.rows(request).await?.into_iter().next())
    }

    async fn insert(&self, request: NewHelpRequest) -> Result<HelpRequest, BoardError> {
        let builder = self
            .http
            .post(&self.endpoint)
            .header("Prefer", "return=representation")
            .json(&[request]);
        self.rows(builder)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BoardError::InvalidResponse {
                message: "insert returned no rows".to_string(),
            })
    }

    async fn set_likes(&self, id: &str, likes: u32) -> Result<HelpRequest, BoardError> {
        let request = self
            .http
            .patch(&self.endpoint)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&json!({ "likes": likes }));
        self.rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BoardError::NotFound { id: id.to_string() })
    }

    async fn count(&self) -> Result<usize, BoardError> {
        let request = self
            .http
            .head(&self.endpoint)
            .query(&[("select", "*")])
            .header("Prefer", "count=exact");
        let response = self.send(request).await?;

        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| BoardError::InvalidResponse {
                message: "missing or malformed Content-Range header".to_string(),
            })
    }

    async fn ids_by_created_asc(&self) -> Result<Vec<String>, BoardError> {
        let request = self
            .http
            .get(&self.endpoint)
            .query(&[("select", "id"), ("order", "created_at.asc")]);
        let rows: Vec<Value> = self.rows(request).await?;
        Ok(rows.iter().filter_map(id_text).collect())
    }

    fn backend(&self) -> &'static str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-9/42"), Some(42));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-9/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn test_new_requires_configuration() {
        let err = SupabaseStore::new(&SupabaseConfig::new(
            Some("https://x.supabase.co".to_string()),
            None,
        ))
        .unwrap_err();
        match err {
            BoardError::NotConfigured { missing } => {
                assert_eq!(missing, "SUPABASE_SERVICE_ROLE_KEY")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(order_clause(HelpRequestOrder::Latest), "created_at.desc");
        assert_eq!(
            order_clause(HelpRequestOrder::Popular),
            "likes.desc,created_at.desc"
        );
    }
}
