//! Web router using Axum

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::Stream;
use serde::Deserialize;
use serde_json::{Value, json};
use statusboard_core::{DashboardStore, ProjectsPage, ServicesPage, SchemaReport, views};
use statusboard_types::{HelpRequest, HelpRequestOrder};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use crate::error::ApiError;
use crate::{page, sse};

type AppState = State<Arc<DashboardStore>>;

/// Create the web router
pub fn create_router(store: Arc<DashboardStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/health", get(health_handler))
        .route("/api/setup", get(setup_handler))
        .route("/api/projects", get(projects_handler))
        .route("/api/services", get(services_handler))
        .route("/api/notion/schema", get(schema_handler))
        .route(
            "/api/help-requests",
            get(list_requests_handler).post(create_request_handler),
        )
        .route("/api/help-requests/count", get(count_handler))
        .route("/api/help-requests/{id}/order", get(order_handler))
        .route("/api/help-requests/{id}/like", post(like_handler))
        .route("/api/events", get(sse_handler))
        .layer(cors)
        .with_state(store)
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub refresh: bool,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SchemaQuery {
    pub database: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub content: String,
}

async fn index_handler(State(store): AppState) -> Html<String> {
    let page = store.projects(false).await;
    Html(page::render_status_page(&page, &store.degraded_state()))
}

async fn health_handler(State(store): AppState) -> Json<Value> {
    let state = store.degraded_state();
    Json(json!({
        "status": if state.is_healthy() { "healthy" } else { "degraded" },
        "notion_configured": store.notion().is_configured(),
        "board_backend": store.board().backend(),
        "cached_responses": store.notion().responses().len(),
        "sse_subscribers": store.event_bus().subscriber_count(),
    }))
}

async fn setup_handler(State(store): AppState) -> Json<Value> {
    let missing = store.config().missing_vars();
    Json(json!({
        "configured": missing.is_empty(),
        "missing": missing,
    }))
}

async fn projects_handler(
    State(store): AppState,
    Query(query): Query<RefreshQuery>,
) -> Json<ProjectsPage> {
    let mut page = store.projects(query.refresh).await;
    if let Some(term) = query.q.as_deref() {
        let before = page.projects.len();
        page.projects = views::filter_projects(&page.projects, term)
            .into_iter()
            .cloned()
            .collect();
        debug!(term, before, after = page.projects.len(), "Projects filtered");
    }
    Json(page)
}

async fn services_handler(
    State(store): AppState,
    Query(query): Query<RefreshQuery>,
) -> Json<ServicesPage> {
    Json(store.services(query.refresh).await)
}

async fn schema_handler(
    State(store): AppState,
    Query(query): Query<SchemaQuery>,
) -> Result<Json<SchemaReport>, ApiError> {
    let database = query
        .database
        .or_else(|| store.config().notion.projects_database_id.clone())
        .ok_or_else(|| ApiError::BadRequest("database 파라미터가 필요합니다".to_string()))?;

    let schema = store.notion().schema(&database).await?;
    Ok(Json(schema.report()))
}

async fn list_requests_handler(
    State(store): AppState,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Vec<HelpRequest>>, ApiError> {
    let order = match query.order.as_deref() {
        Some(raw) => raw.parse::<HelpRequestOrder>().map_err(ApiError::BadRequest)?,
        None => HelpRequestOrder::default(),
    };
    Ok(Json(store.board().list(order).await?))
}

async fn create_request_handler(
    State(store): AppState,
    Json(post): Json<NewPost>,
) -> Result<impl IntoResponse, ApiError> {
    let created = store.board().submit(&post.content).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn count_handler(State(store): AppState) -> Json<Value> {
    Json(json!({ "count": store.board().count().await }))
}

async fn order_handler(State(store): AppState, Path(id): Path<String>) -> Json<Value> {
    let order = store.board().order_of(&id).await;
    Json(json!({ "id": id, "order": order }))
}

async fn like_handler(
    State(store): AppState,
    Path(id): Path<String>,
) -> Result<Json<HelpRequest>, ApiError> {
    Ok(Json(store.board().like(&id).await?))
}

/// SSE endpoint for live updates
async fn sse_handler(State(store): AppState) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    sse::create_sse_stream(store.event_bus())
}
