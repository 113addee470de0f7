//! Error types for statusboard-core
//!
//! Every data-fetching path degrades to a well-shaped value at the edge; these
//! enums carry the failure up to that point.

use thiserror::Error;

/// Core error type for statusboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Notion(#[from] NotionError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

// ===================
// Content API
// ===================

/// Failures talking to the Notion API
///
/// Display strings are the user-facing messages shown in the dashboard's
/// error panel.
#[derive(Error, Debug)]
pub enum NotionError {
    #[error("NOTION_API_KEY 환경변수가 설정되지 않았습니다. 환경변수를 확인해주세요.")]
    MissingApiKey,

    #[error("데이터베이스 ID가 제공되지 않았습니다. 올바른 데이터베이스 ID를 전달해주세요.")]
    MissingDatabaseId,

    /// Non-2xx response, already classified into a readable message
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Connection, timeout or body decoding failure
    #[error("Notion API 호출 중 오류가 발생했습니다: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
}

impl NotionError {
    /// Only transport-level failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, NotionError::Transport { .. })
    }

    /// HTTP status code for classified API errors
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NotionError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Missing key or database id; callers should fall back to sample data
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            NotionError::MissingApiKey | NotionError::MissingDatabaseId
        )
    }
}

impl From<reqwest::Error> for NotionError {
    fn from(source: reqwest::Error) -> Self {
        NotionError::Transport { source }
    }
}

// ===================
// Help board
// ===================

/// Failures of the community board and its relational store
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("내용을 입력해주세요")]
    EmptyContent,

    #[error("Help request not found: {id}")]
    NotFound { id: String },

    #[error("Supabase is not configured: {missing}")]
    NotConfigured { missing: String },

    #[error("Supabase request failed ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Supabase request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected Supabase response: {message}")]
    InvalidResponse { message: String },
}

impl From<reqwest::Error> for BoardError {
    fn from(source: reqwest::Error) -> Self {
        BoardError::Transport { source }
    }
}

/// Degraded state indicator for the dashboard store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedState {
    /// Every data source is configured
    Healthy,
    /// Some sources are unconfigured; their pages show sample data
    PartialData {
        missing: Vec<String>,
        reason: String,
    },
}

impl DegradedState {
    /// Derive the state from the list of missing environment variables
    pub fn from_missing(missing: Vec<String>) -> Self {
        if missing.is_empty() {
            DegradedState::Healthy
        } else {
            DegradedState::PartialData {
                reason: format!("Missing: {}", missing.join(", ")),
                missing,
            }
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, DegradedState::Healthy)
    }

    pub fn is_degraded(&self) -> bool {
        !self.is_healthy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notion_error_classification() {
        let api = NotionError::Api {
            status: 404,
            message: "not found".to_string(),
        };
        assert!(!api.is_retryable());
        assert_eq!(api.status_code(), Some(404));
        assert_eq!(api.to_string(), "not found");

        assert!(NotionError::MissingApiKey.is_config_error());
        assert!(NotionError::MissingDatabaseId.is_config_error());
        assert_eq!(NotionError::MissingApiKey.status_code(), None);
    }

    #[test]
    fn test_degraded_state_from_missing() {
        assert!(DegradedState::from_missing(vec![]).is_healthy());

        let state = DegradedState::from_missing(vec![
            "NOTION_API_KEY".to_string(),
            "SUPABASE_URL".to_string(),
        ]);
        assert!(state.is_degraded());
        match state {
            DegradedState::PartialData { missing, reason } => {
                assert_eq!(missing.len(), 2);
                assert_eq!(reason, "Missing: NOTION_API_KEY, SUPABASE_URL");
            }
            DegradedState::Healthy => panic!("expected partial data"),
        }
    }
}
