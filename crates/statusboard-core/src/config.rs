//! Runtime configuration read from the environment
//!
//! Secrets never appear in `Debug` output.

use std::fmt;
use std::time::Duration;

pub const ENV_NOTION_API_KEY: &str = "NOTION_API_KEY";
pub const ENV_NOTION_DATABASE_ID_PROJECTS: &str = "NOTION_DATABASE_ID_PROJECTS";
pub const ENV_NOTION_DATABASE_ID_SERVICES: &str = "NOTION_DATABASE_ID_SERVICES";
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Variables the dashboard needs, in the order the setup page lists them
pub const REQUIRED_ENV_VARS: &[&str] = &[
    ENV_NOTION_API_KEY,
    ENV_NOTION_DATABASE_ID_PROJECTS,
    ENV_NOTION_DATABASE_ID_SERVICES,
    ENV_SUPABASE_URL,
    ENV_SUPABASE_SERVICE_ROLE_KEY,
];

/// Names of required variables that are unset or blank
pub fn missing_env_vars() -> Vec<String> {
    missing_from(|name| std::env::var(name).ok())
}

/// Same as [`missing_env_vars`] against an arbitrary lookup
pub fn missing_from<F>(lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED_ENV_VARS
        .iter()
        .filter(|name| lookup(name).map_or(true, |v| v.trim().is_empty()))
        .map(|name| name.to_string())
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Content API settings
#[derive(Clone)]
pub struct NotionConfig {
    pub api_key: Option<String>,
    pub projects_database_id: Option<String>,
    pub services_database_id: Option<String>,
    pub base_url: String,
    pub notion_version: String,
    pub page_size: u32,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    pub request_timeout: Duration,
    /// Lifetime of cached query responses
    pub cache_expiry: Duration,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            projects_database_id: None,
            services_database_id: None,
            base_url: "https://api.notion.com".to_string(),
            notion_version: "2022-06-28".to_string(),
            page_size: 100,
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            cache_expiry: Duration::from_secs(60),
        }
    }
}

impl fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("projects_database_id", &self.projects_database_id)
            .field("services_database_id", &self.services_database_id)
            .field("base_url", &self.base_url)
            .field("notion_version", &self.notion_version)
            .field("page_size", &self.page_size)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay", &self.retry_base_delay)
            .field("request_timeout", &self.request_timeout)
            .field("cache_expiry", &self.cache_expiry)
            .finish()
    }
}

impl NotionConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: non_blank(std::env::var(ENV_NOTION_API_KEY).ok()),
            projects_database_id: non_blank(std::env::var(ENV_NOTION_DATABASE_ID_PROJECTS).ok()),
            services_database_id: non_blank(std::env::var(ENV_NOTION_DATABASE_ID_SERVICES).ok()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = non_blank(Some(api_key.into()));
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_databases(
        mut self,
        projects: Option<String>,
        services: Option<String>,
    ) -> Self {
        self.projects_database_id = non_blank(projects);
        self.services_database_id = non_blank(services);
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn with_cache_expiry(mut self, expiry: Duration) -> Self {
        self.cache_expiry = expiry;
        self
    }
}

/// Relational store settings
#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub service_role_key: Option<String>,
    /// Table holding the board posts
    pub table: String,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field(
                "service_role_key",
                &self.service_role_key.as_ref().map(|_| "<redacted>"),
            )
            .field("table", &self.table)
            .finish()
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl SupabaseConfig {
    pub const DEFAULT_TABLE: &'static str = "help_requests";

    pub fn new(url: Option<String>, service_role_key: Option<String>) -> Self {
        Self {
            url: non_blank(url),
            service_role_key: non_blank(service_role_key),
            table: Self::DEFAULT_TABLE.to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var(ENV_SUPABASE_URL).ok(),
            std::env::var(ENV_SUPABASE_SERVICE_ROLE_KEY).ok(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.service_role_key.is_some()
    }

    /// Names of the unset variables, empty when configured
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.url.is_none() {
            missing.push(ENV_SUPABASE_URL);
        }
        if self.service_role_key.is_none() {
            missing.push(ENV_SUPABASE_SERVICE_ROLE_KEY);
        }
        missing
    }
}

/// Top-level configuration handed to [`crate::DashboardStore`]
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub notion: NotionConfig,
    pub supabase: SupabaseConfig,
    /// Capacity of the event bus channel
    pub event_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::new(NotionConfig::default(), SupabaseConfig::default())
    }
}

impl DashboardConfig {
    pub fn new(notion: NotionConfig, supabase: SupabaseConfig) -> Self {
        Self {
            notion,
            supabase,
            event_capacity: 256,
        }
    }

    pub fn from_env() -> Self {
        Self::new(NotionConfig::from_env(), SupabaseConfig::from_env())
    }

    /// Missing variables derived from this config rather than the process env
    pub fn missing_vars(&self) -> Vec<String> {
        let notion = &self.notion;
        let mut missing = Vec::new();
        if notion.api_key.is_none() {
            missing.push(ENV_NOTION_API_KEY.to_string());
        }
        if notion.projects_database_id.is_none() {
            missing.push(ENV_NOTION_DATABASE_ID_PROJECTS.to_string());
        }
        if notion.services_database_id.is_none() {
            missing.push(ENV_NOTION_DATABASE_ID_SERVICES.to_string());
        }
        missing.extend(self.supabase.missing().into_iter().map(String::from));
        missing
    }
}
