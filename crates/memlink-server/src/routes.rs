//! Router configuration.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{health, manifest, memory};
use crate::state::AppState;

/// Build the full router.
pub fn build_router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        .route("/write", post(memory::write))
        .route("/query", post(memory::query))
        .route("/graph", post(memory::graph))
        .route("/ping", get(health::ping))
        .route("/health", get(health::health))
        .route(
            "/.well-known/ai-plugin.json",
            get(manifest::plugin_manifest),
        )
        .route("/openapi.yaml", get(manifest::openapi_spec))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use memlink_core::config::GraphSettings;
    use memlink_graph::testing::ScriptedExecutor;
    use memlink_graph::MemoryGraph;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn app_with(exec: Arc<ScriptedExecutor>, static_dir: &Path) -> Router {
        let memory = MemoryGraph::new(exec, GraphSettings::default(), 100);
        build_router(AppState::new(memory, static_dir), true)
    }

    fn app(exec: Arc<ScriptedExecutor>) -> Router {
        app_with(exec, Path::new("/nonexistent-memlink-static"))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let response = app(Arc::new(ScriptedExecutor::new()))
            .oneshot(get_req("/ping"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "pong");
    }

    #[tokio::test]
    async fn test_health_ok_and_error() {
        let exec = Arc::new(ScriptedExecutor::new());
        let response = app(exec.clone()).oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));

        exec.fail_ping("Connection refused");
        let response = app(exec).oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["status"], json!("error"));
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Connection refused"));
    }

    #[tokio::test]
    async fn test_write_ok() {
        let exec = Arc::new(ScriptedExecutor::new());
        exec.push_rows(vec![json!({"nodeId": "4:db:7"})]);

        let response = app(exec)
            .oneshot(post_json("/write", r#"{"text": "A", "context": {"k": 1}}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "status": "ok",
                "label": "Memory",
                "mode": "create",
                "nodeId": "4:db:7",
                "relationships": 0
            })
        );
    }

    #[tokio::test]
    async fn test_write_skipped() {
        let exec = Arc::new(ScriptedExecutor::new());
        exec.push_rows(vec![json!({"nodeId": "4:db:7", "existed": true})]);

        let response = app(exec.clone())
            .oneshot(post_json(
                "/write",
                r#"{"text": "A", "mode": "skip", "relationships": [{"from": "A", "to": "B", "type": "LIKES"}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "skipped", "node": "A"})
        );
        assert_eq!(exec.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_write_schema_violations_are_400() {
        for body in [
            r#"{"label": "Memory"}"#,
            r#"{"text": ""}"#,
            r#"{"text": "A", "mode": "replace"}"#,
            r#"{"text": "A", "context": [1, 2]}"#,
            r#"{"text": "#,
        ] {
            let exec = Arc::new(ScriptedExecutor::new());
            let response = app(exec.clone())
                .oneshot(post_json("/write", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(body_json(response).await["status"], json!("error"));
            assert!(exec.statements().is_empty());
        }
    }

    #[tokio::test]
    async fn test_write_store_failure_is_500() {
        let exec = Arc::new(ScriptedExecutor::new());
        exec.push_error("Node(1) already exists with label `Memory`");

        let response = app(exec)
            .oneshot(post_json("/write", r#"{"text": "A"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("already exists with label"));
    }

    #[tokio::test]
    async fn test_query_rejects_destructive_keywords() {
        for cypher in [
            "MATCH (n) DETACH DELETE n",
            "drop index x",
            "MATCH (n) dElEtE n",
        ] {
            let exec = Arc::new(ScriptedExecutor::new());
            let body = json!({"cypher": cypher}).to_string();
            let response = app(exec.clone())
                .oneshot(post_json("/query", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert!(exec.statements().is_empty());
        }
    }

    #[tokio::test]
    async fn test_query_client_errors() {
        for body in [
            r#"{}"#,
            r#"{"cypher": 5}"#,
            r#"{"cypher": "   "}"#,
            r#"{"preset": "everything"}"#,
            r#"{"cypher": "RETURN 1", "format": "xml"}"#,
        ] {
            let response = app(Arc::new(ScriptedExecutor::new()))
                .oneshot(post_json("/query", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }
    }

    #[tokio::test]
    async fn test_query_ok() {
        let exec = Arc::new(ScriptedExecutor::new());
        exec.push_rows(vec![json!({"n": {"properties": {"context": "{\"a\":1}"}}})]);

        let response = app(exec)
            .oneshot(post_json("/query", r#"{"preset": "recent", "limit": -5}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "status": "ok",
                "records": 1,
                "format": "json",
                "preset": "recent",
                "results": [{"n": {"properties": {"context": {"a": 1}}}}]
            })
        );
    }

    #[tokio::test]
    async fn test_graph_accepts_empty_body() {
        let exec = Arc::new(ScriptedExecutor::new());
        let request = Request::builder()
            .method("POST")
            .uri("/graph")
            .body(Body::empty())
            .unwrap();

        let response = app(exec.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "ok", "nodes": [], "links": []})
        );
        assert_eq!(exec.statements()[0].params["limit"], json!(100));
    }

    #[tokio::test]
    async fn test_graph_malformed_body_is_400() {
        let response = app(Arc::new(ScriptedExecutor::new()))
            .oneshot(post_json("/graph", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".well-known")).unwrap();
        std::fs::write(
            dir.path().join(".well-known/ai-plugin.json"),
            r#"{"name_for_model": "memlink"}"#,
        )
        .unwrap();

        let exec = Arc::new(ScriptedExecutor::new());
        let response = app_with(exec.clone(), dir.path())
            .oneshot(get_req("/.well-known/ai-plugin.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(
            body_json(response).await["name_for_model"],
            json!("memlink")
        );

        let response = app_with(exec, dir.path())
            .oneshot(get_req("/openapi.yaml"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("openapi.yaml not found"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app(Arc::new(ScriptedExecutor::new()))
            .oneshot(get_req("/nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
