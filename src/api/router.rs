use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::{chat, health, sources, upload};

/// Chat page served at `/`
pub const CHAT_PAGE: &str = "public/chat.html";

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(CHAT_PAGE))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES)),
        )
        .route("/chat", post(chat::chat))
        .route("/chat/{session_id}", delete(chat::reset_session))
        .route("/sources", get(sources::list_sources))
        .route("/sources/{source}", delete(sources::delete_source))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::{FileOutcome, IngestionResult, SourceSummary};
    use crate::infrastructure::services::{MockIngestionService, MockQueryService, NOT_A_PDF};

    const BOUNDARY: &str = "book-rag-boundary";

    fn router(ingestion: MockIngestionService, query: MockQueryService) -> Router {
        create_router_with_state(AppState::new(Arc::new(ingestion), Arc::new(query)))
    }

    fn state_router(
        ingestion: Arc<MockIngestionService>,
        query: Arc<MockQueryService>,
    ) -> Router {
        create_router_with_state(AppState::new(ingestion, query))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn chat_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(parts: &[(&str, &str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (field, filename, content) in parts {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_chat_returns_query_and_response() {
        let query = Arc::new(MockQueryService::new("X"));
        let app = state_router(Arc::new(MockIngestionService::new()), query.clone());

        let response = app
            .oneshot(chat_request(json!({"query": "disheartened"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"query": "disheartened", "response": "X"})
        );
        assert_eq!(query.calls(), vec![(None, "disheartened".to_string())]);
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_without_calls() {
        let query = Arc::new(MockQueryService::new("X"));

        for body in [json!({"query": "   "}), json!({})] {
            let app = state_router(Arc::new(MockIngestionService::new()), query.clone());
            let response = app.oneshot(chat_request(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await, json!({"error": "query is required"}));
        }

        assert!(query.calls().is_empty());
    }

    #[tokio::test]
    async fn test_chat_passes_session_id() {
        let query = Arc::new(MockQueryService::new("ok"));
        let app = state_router(Arc::new(MockIngestionService::new()), query.clone());

        app.oneshot(chat_request(json!({"query": "again", "session_id": "reader-7"})))
            .await
            .unwrap();

        assert_eq!(query.calls()[0].0.as_deref(), Some("reader-7"));
    }

    #[tokio::test]
    async fn test_chat_provider_error_is_bad_gateway() {
        let app = router(
            MockIngestionService::new(),
            MockQueryService::new("X").with_error("quota exceeded"),
        );

        let response = app
            .oneshot(chat_request(json!({"query": "disheartened"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await,
            json!({"error": "mock: quota exceeded"})
        );
    }

    #[tokio::test]
    async fn test_reset_session_returns_no_content() {
        let app = router(MockIngestionService::new(), MockQueryService::new("X"));

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/chat/reader-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_upload_reports_each_file() {
        let ingested = FileOutcome::Ingested(IngestionResult {
            file: "book.pdf".into(),
            chunks: 2,
            added: 2,
            collection: "book_knowledge".into(),
        });
        let ingestion = Arc::new(MockIngestionService::new().with_outcomes(vec![
            ingested,
            FileOutcome::skipped("notes.txt", NOT_A_PDF),
        ]));
        let app = state_router(ingestion.clone(), Arc::new(MockQueryService::new("X")));

        let response = app
            .oneshot(multipart_request(&[
                ("files", "book.pdf", "%PDF-1.5"),
                ("files", "notes.txt", "hello"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "ok": true,
                "model": "models/text-embedding-004",
                "results": [
                    {"file": "book.pdf", "chunks": 2, "added": 2, "collection": "book_knowledge"},
                    {"file": "notes.txt", "status": "skipped", "reason": "not a pdf"}
                ]
            })
        );
        assert_eq!(ingestion.received(), vec!["book.pdf", "notes.txt"]);
    }

    #[tokio::test]
    async fn test_upload_without_files_field_is_bad_request() {
        let app = router(MockIngestionService::new(), MockQueryService::new("X"));

        let response = app
            .oneshot(multipart_request(&[("document", "book.pdf", "%PDF")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"]
            .as_str()
            .unwrap()
            .contains("files"));
    }

    #[tokio::test]
    async fn test_upload_with_empty_files_is_bad_request() {
        let app = router(MockIngestionService::new(), MockQueryService::new("X"));

        let response = app
            .oneshot(multipart_request(&[("files", "", "")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "no files uploaded"}));
    }

    #[tokio::test]
    async fn test_upload_requires_multipart() {
        let app = router(MockIngestionService::new(), MockQueryService::new("X"));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sources_listing() {
        let ingestion = MockIngestionService::new().with_sources(vec![SourceSummary {
            source: "book.pdf".into(),
            records: 12,
            updated_at: None,
        }]);
        let app = router(ingestion, MockQueryService::new("X"));

        let response = app
            .oneshot(Request::builder().uri("/sources").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "collection": "book_knowledge",
                "total_records": 12,
                "sources": [{"source": "book.pdf", "records": 12}]
            })
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_source_is_not_found() {
        let app = router(MockIngestionService::new(), MockQueryService::new("X"));

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/sources/missing.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let app = router(MockIngestionService::new(), MockQueryService::new("X"));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");

        let app = router(MockIngestionService::new().not_ready(), MockQueryService::new("X"));
        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["checks"][0]["name"], "document_store");
    }

    #[tokio::test]
    async fn test_index_serves_chat_page() {
        let app = router(MockIngestionService::new(), MockQueryService::new("X"));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("<form"));
    }

    #[tokio::test]
    async fn test_chat_page_session_id_works_without_secure_context() {
        let app = router(MockIngestionService::new(), MockQueryService::new("X"));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8_lossy(&bytes);
        assert!(page.contains(r#"typeof crypto.randomUUID === "function""#));
        assert!(page.contains("Math.random().toString(36)"));
        assert!(!page.contains(r#"|| crypto.randomUUID()"#));
    }
}
