//! JSON error responses for the API routes

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use statusboard_core::{BoardError, NotionError};
use tracing::warn;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Board(BoardError),
    Notion(NotionError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Board(BoardError::EmptyContent) => StatusCode::BAD_REQUEST,
            ApiError::Board(BoardError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Board(BoardError::NotConfigured { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Board(_) => StatusCode::BAD_GATEWAY,
            ApiError::Notion(e) if e.is_config_error() => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Notion(e) => match e.status_code() {
                Some(404) => StatusCode::NOT_FOUND,
                Some(429) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Board(e) => e.to_string(),
            ApiError::Notion(e) => e.to_string(),
        }
    }
}

impl From<BoardError> for ApiError {
    fn from(e: BoardError) -> Self {
        ApiError::Board(e)
    }
}

impl From<NotionError> for ApiError {
    fn from(e: NotionError) -> Self {
        ApiError::Notion(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %message, "API request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(BoardError::EmptyContent).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(BoardError::NotFound { id: "x".into() }).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(NotionError::MissingApiKey).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(NotionError::Api {
                status: 500,
                message: "boom".into()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
