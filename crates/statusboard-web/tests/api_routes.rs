//! Router tests driven through `tower::ServiceExt::oneshot`

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use httpmock::MockServer;
use serde_json::{Value, json};
use statusboard_core::{DashboardConfig, DashboardStore, NotionConfig, SupabaseConfig};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const DB: &str = "abcdef0123456789";

fn offline_router() -> Router {
    let store = DashboardStore::new(DashboardConfig::default()).unwrap();
    statusboard_web::create_router(Arc::new(store))
}

fn notion_router(server: &MockServer) -> Router {
    let notion = NotionConfig::default()
        .with_api_key("secret_test")
        .with_base_url(server.base_url())
        .with_databases(Some(DB.to_string()), None)
        .with_retry_base_delay(Duration::from_millis(5));
    let config = DashboardConfig::new(notion, SupabaseConfig::default());
    statusboard_web::create_router(Arc::new(DashboardStore::new(config).unwrap()))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, String) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

#[tokio::test]
async fn test_status_page_renders_error_panel_on_not_found() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST").path(format!("/v1/databases/{DB}/query"));
        then.status(404)
            .json_body(json!({"object": "error", "status": 404, "code": "object_not_found"}));
    });
    let router = notion_router(&server);

    let (status, html) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"class="error-panel""#));
    assert!(html.contains("데이터베이스를 찾을 수 없습니다."));
    assert!(html.contains("HTTP 404"));

    let (_, body) = get(&router, "/api/projects").await;
    let page: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(page["status_code"], 404);
    assert_eq!(page["projects"], json!([]));
    assert_eq!(page["use_mock_data"], false);

    // errors are never cached, so each render asks again
    mock.assert_calls(2);
}

#[tokio::test]
async fn test_projects_search_filters_rows() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path(format!("/v1/databases/{DB}/query"));
        then.status(200).json_body(json!({
            "object": "list",
            "results": [
                {
                    "id": "p1",
                    "created_time": "2025-02-17T01:00:00.000Z",
                    "properties": {
                        "이름": {"type": "title", "title": [{"plain_text": "AI 비서"}]},
                        "Stage": {"type": "select", "select": {"name": "진행중"}}
                    }
                },
                {
                    "id": "p2",
                    "created_time": "2025-02-18T01:00:00.000Z",
                    "properties": {
                        "이름": {"type": "title", "title": [{"plain_text": "데이터 플랫폼"}]},
                        "Stage": {"type": "select", "select": {"name": "진행완료"}}
                    }
                }
            ],
            "has_more": false,
            "next_cursor": null
        }));
    });
    let router = notion_router(&server);

    let (status, body) = get(&router, "/api/projects?q=%EB%B9%84%EC%84%9C").await;
    assert_eq!(status, StatusCode::OK);
    let page: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(page["projects"].as_array().unwrap().len(), 1);
    assert_eq!(page["projects"][0]["title"], "AI 비서");
    assert_eq!(page["stats"]["total"], 2);

    let (_, html) = get(&router, "/").await;
    assert!(html.contains("데이터 플랫폼"));
    assert!(!html.contains(r#"class="error-panel""#));
}

#[tokio::test]
async fn test_health_and_setup_report_missing_configuration() {
    let router = offline_router();

    let (status, body) = get(&router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["notion_configured"], false);
    assert_eq!(health["board_backend"], "memory");

    let (_, body) = get(&router, "/api/setup").await;
    let setup: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(setup["configured"], false);
    let missing = setup["missing"].as_array().unwrap();
    assert!(missing.contains(&json!("NOTION_API_KEY")));
    assert!(missing.contains(&json!("SUPABASE_URL")));
}

#[tokio::test]
async fn test_unconfigured_projects_fall_back_to_sample_mode() {
    let router = offline_router();

    let (status, body) = get(&router, "/api/services?refresh=true").await;
    assert_eq!(status, StatusCode::OK);
    let page: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(page["use_mock_data"], true);
    assert_eq!(page["services"], json!([]));

    let (status, _) = get(&router, "/api/notion/schema").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_help_request_lifecycle() {
    let router = offline_router();

    let (status, body) = post_json(
        &router,
        "/api/help-requests",
        json!({"content": "배포 파이프라인이 멈췄어요"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_str(&body).unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["author"], "익명");
    assert_eq!(created["likes"], 0);

    let (status, body) = post_json(&router, &format!("/api/help-requests/{id}/like"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let liked: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(liked["likes"], 1);

    let (_, body) = get(&router, "/api/help-requests/count").await;
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["count"], 1);

    let (_, body) = get(&router, &format!("/api/help-requests/{id}/order")).await;
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["order"], 1);

    let (status, body) = get(&router, "/api/help-requests?order=popular").await;
    assert_eq!(status, StatusCode::OK);
    let rows: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_help_request_errors() {
    let router = offline_router();

    let (status, body) = post_json(&router, "/api/help-requests", json!({"content": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap()["error"],
        "내용을 입력해주세요"
    );

    let (status, _) = post_json(&router, "/api/help-requests/missing/like", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&router, "/api/help-requests?order=random").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&router, "/api/help-requests/unknown/order").await;
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["order"], Value::Null);
}
